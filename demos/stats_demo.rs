use clap::Parser;
use shift_hash::HashMap;
use shift_hash::HashSet;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "num_values", default_value_t = 1000)]
    num_values: u64,

    /// Fraction of the inserted keys to remove again, in `[0, 1]`.
    #[arg(short = 'r', long = "remove_fraction", default_value_t = 0.5)]
    remove_fraction: f64,
}

fn main() {
    let args = Args::parse();

    println!("Filling HashMap with {} u64 values...", args.num_values);

    let mut map: HashMap<u64, u64> = HashMap::new();
    for i in 0..args.num_values {
        if map.insert(i, i.wrapping_mul(31)).is_some() {
            panic!("Value already exists in map: {}", i);
        }
    }

    println!("Inserted {} values into map", map.len());
    println!("Capacity after inserts: {}", map.capacity());
    map.print_probe_histogram();
    map.debug_stats().print();

    let fraction = args.remove_fraction.clamp(0.0, 1.0);
    let to_remove = (args.num_values as f64 * fraction) as u64;
    println!("Removing {} values...", to_remove);

    for i in 0..to_remove {
        if map.remove(&i).is_none() {
            panic!("Value missing from map: {}", i);
        }
    }

    println!(
        "Final load factor: {:.2}%",
        (map.len() as f64 / map.capacity().max(1) as f64) * 100.0
    );
    map.print_probe_histogram();
    map.debug_stats().print();

    let set: HashSet<u64> = map.keys().copied().collect();
    println!("Set of remaining keys: {} elements, hash {:#018x}", set.len(), set.hash());
    set.print_probe_histogram();
    set.debug_stats().print();
}
