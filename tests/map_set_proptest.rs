use std::collections::HashMap as StdHashMap;
use std::collections::HashSet as StdHashSet;

use proptest::prelude::*;
use shift_hash::HashKey;
use shift_hash::HashMap;
use shift_hash::HashSet;
use shift_hash::KeyHasher;

// Slot count must stay a power of two of at least 16, at most 3/4 full, and
// at least 1/4 full unless it is at the minimum.
fn capacity_is_sane(len: usize, capacity: usize) -> bool {
    if capacity == 0 {
        return len == 0;
    }
    capacity.is_power_of_two()
        && capacity >= 16
        && len <= capacity / 4 * 3
        && (capacity == 16 || len >= capacity / 4)
}

/// A key whose hash deliberately ignores most of its bits, to force long
/// collision runs through the probe and shift paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Clustered(u32);

impl HashKey for Clustered {
    fn hash_key(&self) -> u64 {
        let mut hasher = KeyHasher::new();
        hasher.write_key(&(self.0 % 7));
        hasher.finish()
    }

    fn key_eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

proptest! {
    #[test]
    fn prop_map_matches_std(ops in proptest::collection::vec((0u8..=3u8, 0u32..200u32, any::<u32>()), 1..400)) {
        let mut map: HashMap<u32, u32> = HashMap::new();
        let mut model: StdHashMap<u32, u32> = StdHashMap::new();

        for (op, key, value) in ops {
            match op {
                0 | 1 => {
                    prop_assert_eq!(map.insert(key, value), model.insert(key, value));
                }
                2 => {
                    prop_assert_eq!(map.remove(&key), model.remove(&key));
                }
                3 => {
                    prop_assert_eq!(map.get(&key), model.get(&key));
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(map.len(), model.len());
            prop_assert!(capacity_is_sane(map.len(), map.capacity()), "len {} capacity {}", map.len(), map.capacity());
        }

        for (key, value) in model.iter() {
            prop_assert_eq!(map.get(key), Some(value));
        }
        prop_assert_eq!(map.iter().count(), model.len());
    }

    #[test]
    fn prop_colliding_keys_survive_churn(ops in proptest::collection::vec((any::<bool>(), 0u32..120u32), 1..500)) {
        let mut set: HashSet<Clustered> = HashSet::new();
        let mut model: StdHashSet<Clustered> = StdHashSet::new();

        for (insert, raw) in ops {
            let key = Clustered(raw);
            if insert {
                prop_assert_eq!(set.insert(key), model.insert(key));
            } else {
                prop_assert_eq!(set.remove(&key), model.remove(&key));
            }
            prop_assert!(capacity_is_sane(set.len(), set.capacity()));
        }

        prop_assert_eq!(set.len(), model.len());
        for key in model.iter() {
            prop_assert!(set.contains(key));
        }
        for key in set.iter() {
            prop_assert!(model.contains(key));
        }
    }

    #[test]
    fn prop_set_hash_is_order_independent(mut keys in proptest::collection::vec(0u64..1000u64, 0..200)) {
        let forward: HashSet<u64> = keys.iter().copied().collect();
        keys.reverse();
        let mut backward: HashSet<u64> = keys.iter().copied().collect();

        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(forward.hash(), backward.hash());

        // Removing and re-adding returns to the same hash.
        let before = backward.hash();
        if let Some(&first) = keys.first() {
            prop_assert!(backward.remove(&first));
            backward.insert(first);
        }
        prop_assert_eq!(backward.hash(), before);
    }

    #[test]
    fn prop_set_algebra_matches_std(
        left in proptest::collection::vec(0u16..300u16, 0..150),
        right in proptest::collection::vec(0u16..300u16, 0..150),
    ) {
        let a: HashSet<u16> = left.iter().copied().collect();
        let b: HashSet<u16> = right.iter().copied().collect();
        let std_a: StdHashSet<u16> = left.iter().copied().collect();
        let std_b: StdHashSet<u16> = right.iter().copied().collect();

        let to_std = |set: &HashSet<u16>| set.iter().copied().collect::<StdHashSet<u16>>();

        prop_assert_eq!(to_std(&a.union(&b)), std_a.union(&std_b).copied().collect::<StdHashSet<u16>>());
        prop_assert_eq!(to_std(&a.intersection(&b)), std_a.intersection(&std_b).copied().collect::<StdHashSet<u16>>());
        prop_assert_eq!(to_std(&a.difference(&b)), std_a.difference(&std_b).copied().collect::<StdHashSet<u16>>());
        prop_assert_eq!(
            to_std(&a.symmetric_difference(&b)),
            std_a.symmetric_difference(&std_b).copied().collect::<StdHashSet<u16>>()
        );
        prop_assert_eq!(a.is_subset(&b), std_a.is_subset(&std_b));
        prop_assert_eq!(a.is_disjoint(&b), std_a.is_disjoint(&std_b));

        // Commutativity, including the aggregate hash.
        prop_assert_eq!(a.union(&b), b.union(&a));
        prop_assert_eq!(a.intersection(&b).hash(), b.intersection(&a).hash());
        prop_assert_eq!(&a ^ &b, &b ^ &a);

        // (a - b) and (a & b) partition a.
        let diff = a.difference(&b);
        let both = a.intersection(&b);
        prop_assert!(diff.is_disjoint(&both));
        prop_assert_eq!(diff.union(&both), a.clone());
        if !diff.is_empty() && !both.is_empty() {
            prop_assert_eq!(diff.hash() ^ both.hash(), a.hash());
        }
    }

    #[test]
    fn prop_sets_as_map_keys(groups in proptest::collection::vec(proptest::collection::vec(0u8..20u8, 0..6), 1..40)) {
        let mut map: HashMap<HashSet<u8>, usize> = HashMap::new();
        let mut model: StdHashMap<Vec<u8>, usize> = StdHashMap::new();

        for (i, group) in groups.iter().enumerate() {
            let set: HashSet<u8> = group.iter().copied().collect();
            let mut canonical: Vec<u8> = group.clone();
            canonical.sort_unstable();
            canonical.dedup();

            prop_assert_eq!(map.insert(set, i), model.insert(canonical, i));
        }

        prop_assert_eq!(map.len(), model.len());
    }
}
