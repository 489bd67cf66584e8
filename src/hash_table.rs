use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem::MaybeUninit;

/// Number of slots allocated on first insert. A populated table never
/// shrinks below this.
pub const MIN_CAPACITY: usize = 16;

/// Forced on in every stored hash so that no live slot can carry the all-zero
/// tag, which is reserved for empty slots.
const TAG_BIT: u64 = 1 << 63;

const EMPTY: u64 = 0;

/// Returns the tag stored for `hash`.
///
/// Tagging is idempotent, so a tag read back out of a table can be passed to
/// any method taking a hash.
#[inline(always)]
pub fn tagged(hash: u64) -> u64 {
    hash | TAG_BIT
}

/// Largest population allowed after an insert before the table doubles.
#[inline(always)]
fn grow_threshold(capacity: usize) -> usize {
    capacity / 4 * 3
}

/// Population below which a removal halves the table.
#[inline(always)]
fn shrink_threshold(capacity: usize) -> usize {
    capacity / 4
}

struct Slot<V> {
    tag: u64,
    value: MaybeUninit<V>,
}

impl<V> Slot<V> {
    #[inline(always)]
    fn vacant() -> Self {
        Slot {
            tag: EMPTY,
            value: MaybeUninit::uninit(),
        }
    }

    #[inline(always)]
    fn is_occupied(&self) -> bool {
        self.tag != EMPTY
    }
}

fn vacant_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    debug_assert!(capacity.is_power_of_two());
    core::iter::repeat_with(Slot::vacant).take(capacity).collect()
}

enum Probe {
    Occupied(usize),
    Vacant(usize),
}

/// Debug statistics for hash table analysis.
///
/// Available under `cfg(test)` or with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Total number of slots allocated
    pub capacity: usize,
    /// Population above which the next insert doubles the table
    pub grow_at: usize,
    /// Population below which the next removal halves the table
    pub shrink_at: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Longest distance between an element and its home slot
    pub max_probe: usize,
    /// Mean distance between an element and its home slot
    pub mean_probe: f64,
    /// Total memory in bytes used by the slot array
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} slots ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Thresholds: grow above {}, shrink below {}",
            self.grow_at, self.shrink_at
        );
        println!(
            "Probe distance: max {}, mean {:.3}",
            self.max_probe, self.mean_probe
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// An open-addressing hash table with linear probing.
///
/// `HashTable<V>` stores values of type `V`. It does not know how to hash or
/// compare values itself: every operation takes the value's 64-bit hash and
/// an equality predicate. [`HashMap`](crate::HashMap) and
/// [`HashSet`](crate::HashSet) are thin layers over it.
///
/// ## Layout
///
/// Each slot holds a tag (the hash with its top bit forced on) and a value.
/// A zero tag marks the slot empty. Lookups start at `tag & (capacity - 1)`
/// and walk forward, wrapping around, until they find the value or reach an
/// empty slot.
///
/// The slot array is allocated lazily with [`MIN_CAPACITY`] slots, doubles
/// when an insert pushes the population above 3/4 of the slots and halves
/// when a removal drops it below 1/4. Removal uses backward-shift deletion:
/// the run of occupied slots after the freed one is re-placed, so no
/// tombstones are ever left behind.
///
/// ## Example
///
/// ```rust
/// use shift_hash::hash_table::Entry;
/// use shift_hash::hash_table::HashTable;
/// use shift_hash::key::hash_u64;
///
/// #[derive(Debug, PartialEq)]
/// struct Person {
///     id: u64,
///     name: String,
/// }
///
/// let mut table = HashTable::new();
/// let hash = hash_u64(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
///
/// assert_eq!(table.find(hash, |p| p.id == 123).map(|p| p.name.as_str()), Some("Alice"));
/// ```
pub struct HashTable<V> {
    slots: Vec<Slot<V>>,
    populated: usize,
}

impl<V: Debug> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;

        f.debug_struct("HashTable")
            .field(
                "slots",
                &self
                    .slots
                    .chunks(16)
                    .map(|row| {
                        row.iter()
                            .map(|slot| {
                                if slot.is_occupied() {
                                    format!("{:02x}", slot.tag & 0xff)
                                } else {
                                    String::from("..")
                                }
                            })
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .collect::<Vec<_>>(),
            )
            .field("values", &self.iter().collect::<Vec<_>>())
            .field("populated", &self.populated)
            .field("capacity", &self.slots.len())
            .finish()
    }
}

impl<V> Clone for HashTable<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        // Tags are copied only after the value lands, so a panicking `clone`
        // leaves `new_table` safe to drop.
        let mut new_table = Self {
            slots: vacant_slots_or_none(self.slots.len()),
            populated: 0,
        };

        for (src, dst) in self.slots.iter().zip(new_table.slots.iter_mut()) {
            if src.is_occupied() {
                // SAFETY: An occupied tag guarantees an initialized value.
                let value = unsafe { src.value.assume_init_ref() }.clone();
                dst.value.write(value);
                dst.tag = src.tag;
                new_table.populated += 1;
            }
        }

        debug_assert_eq!(new_table.populated, self.populated);
        new_table
    }
}

fn vacant_slots_or_none<V>(capacity: usize) -> Vec<Slot<V>> {
    if capacity == 0 {
        Vec::new()
    } else {
        vacant_slots(capacity)
    }
}

impl<V> Drop for HashTable<V> {
    fn drop(&mut self) {
        if core::mem::needs_drop::<V>() && self.populated > 0 {
            for slot in self.slots.iter_mut() {
                if slot.is_occupied() {
                    // SAFETY: Occupied slots hold an initialized value, and the
                    // table is going away so it is dropped exactly once.
                    unsafe { slot.value.assume_init_drop() };
                }
            }
        }
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table. No memory is allocated until the first insert.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use shift_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 0);
    /// ```
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            populated: 0,
        }
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of elements in the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use shift_hash::hash_table::HashTable;
    /// # use shift_hash::key::hash_u64;
    /// #
    /// let mut table = HashTable::new();
    /// assert_eq!(table.len(), 0);
    ///
    /// table.entry(hash_u64(1), |&n: &u64| n == 1).or_insert(1);
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns the number of slots in the table.
    ///
    /// This is zero until the first insert and a power of two, at least
    /// [`MIN_CAPACITY`], afterwards.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Removes all elements and releases the slot array.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use shift_hash::hash_table::HashTable;
    /// # use shift_hash::key::hash_u64;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(hash_u64(1), |&n: &u64| n == 1).or_insert(1);
    /// table.entry(hash_u64(2), |&n: &u64| n == 2).or_insert(2);
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 0);
    /// ```
    pub fn clear(&mut self) {
        let slots = core::mem::take(&mut self.slots);
        self.populated = 0;
        drop(IntoIter::from_slots(slots));
    }

    /// Returns an iterator over all values in the table.
    ///
    /// Values are yielded in slot order, which depends on their hashes and on
    /// the table's history. It is not insertion order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.tagged_iter(),
        }
    }

    /// Returns an iterator over mutable references to all values in the
    /// table.
    ///
    /// Mutating a value must not change its hash or what it compares equal
    /// to.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over the live tags and values, in slot order.
    pub(crate) fn tagged_iter(&self) -> TaggedIter<'_, V> {
        TaggedIter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Finds the slot matching `tag`, or the empty slot that ends its probe
    /// run.
    ///
    /// The table must be allocated. It always holds at least one empty slot,
    /// so the walk terminates.
    #[inline]
    fn probe(&self, tag: u64, eq: impl Fn(&V) -> bool) -> Probe {
        debug_assert!(!self.slots.is_empty());
        let mask = self.slots.len() - 1;
        let mut index = tag as usize & mask;
        loop {
            let slot = &self.slots[index];
            if !slot.is_occupied() {
                return Probe::Vacant(index);
            }
            // SAFETY: An occupied tag guarantees an initialized value.
            if slot.tag == tag && eq(unsafe { slot.value.assume_init_ref() }) {
                return Probe::Occupied(index);
            }
            index = (index + 1) & mask;
        }
    }

    /// Writes `value` into the first empty slot of its probe run.
    ///
    /// Only used for values already known to be unique in the table, so no
    /// equality checks are needed.
    #[inline]
    fn place(&mut self, tag: u64, value: V) -> usize {
        let mask = self.slots.len() - 1;
        let mut index = tag as usize & mask;
        while self.slots[index].is_occupied() {
            index = (index + 1) & mask;
        }

        let slot = &mut self.slots[index];
        slot.value.write(value);
        slot.tag = tag;
        self.populated += 1;
        index
    }

    /// Rebuilds the table into `capacity` slots, re-placing every live value.
    ///
    /// Returns the new index of the value that lived at `track`, or
    /// `usize::MAX` if `track` was not an occupied slot.
    #[cold]
    #[inline(never)]
    fn rebuild(&mut self, capacity: usize, track: usize) -> usize {
        let old = core::mem::replace(&mut self.slots, vacant_slots(capacity));
        let expected = self.populated;
        self.populated = 0;

        let mut tracked = usize::MAX;
        for (index, slot) in old.into_iter().enumerate() {
            if slot.is_occupied() {
                // SAFETY: The value is initialized and moved out exactly once;
                // `Slot` has no drop glue for its value, so the old array
                // releases its memory without touching it again.
                let value = unsafe { slot.value.assume_init() };
                let placed = self.place(slot.tag, value);
                if index == track {
                    tracked = placed;
                }
            }
        }

        debug_assert_eq!(self.populated, expected);
        tracked
    }

    /// Removes the value at `index`, then either shrinks the table or repairs
    /// the probe run that followed the freed slot.
    fn remove_at(&mut self, index: usize) -> V {
        let slot = &mut self.slots[index];
        debug_assert!(slot.is_occupied());
        slot.tag = EMPTY;
        // SAFETY: The slot was occupied and is now marked empty, so the value
        // is read out exactly once.
        let value = unsafe { slot.value.assume_init_read() };
        self.populated -= 1;

        let capacity = self.slots.len();
        if capacity > MIN_CAPACITY && self.populated < shrink_threshold(capacity) {
            self.rebuild(capacity / 2, usize::MAX);
            return value;
        }

        // Backward shift: any value after the hole may have probed past it,
        // so lift each one out and place it again until the run ends.
        let mask = capacity - 1;
        let mut next = (index + 1) & mask;
        while self.slots[next].is_occupied() {
            let slot = &mut self.slots[next];
            let tag = core::mem::replace(&mut slot.tag, EMPTY);
            // SAFETY: The slot was occupied and is now marked empty.
            let displaced = unsafe { slot.value.assume_init_read() };
            self.populated -= 1;
            self.place(tag, displaced);
            next = (next + 1) & mask;
        }

        value
    }

    /// Finds a value in the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use shift_hash::hash_table::HashTable;
    /// # use shift_hash::key::hash_u64;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(hash_u64(42), |&n: &u64| n == 42).or_insert(42);
    ///
    /// assert_eq!(table.find(hash_u64(42), |&n| n == 42), Some(&42));
    /// assert_eq!(table.find(hash_u64(99), |&n| n == 99), None);
    /// ```
    #[inline]
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        if self.populated == 0 {
            return None;
        }

        match self.probe(tagged(hash), eq) {
            // SAFETY: `probe` only reports occupied slots as matches.
            Probe::Occupied(index) => Some(unsafe { self.slots[index].value.assume_init_ref() }),
            Probe::Vacant(_) => None,
        }
    }

    /// Finds a value in the table and returns a mutable reference to it.
    ///
    /// The value's hash and equality must not change through the reference.
    #[inline]
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        if self.populated == 0 {
            return None;
        }

        match self.probe(tagged(hash), eq) {
            // SAFETY: `probe` only reports occupied slots as matches.
            Probe::Occupied(index) => Some(unsafe { self.slots[index].value.assume_init_mut() }),
            Probe::Vacant(_) => None,
        }
    }

    /// Removes and returns a value from the table.
    ///
    /// Removing from an empty table, or removing a value that is not present,
    /// does nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use shift_hash::hash_table::HashTable;
    /// # use shift_hash::key::hash_u64;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(hash_u64(42), |&n: &u64| n == 42).or_insert(42);
    ///
    /// assert_eq!(table.remove(hash_u64(42), |&n| n == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.remove(hash_u64(99), |&n| n == 99), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        if self.populated == 0 {
            return None;
        }

        match self.probe(tagged(hash), eq) {
            Probe::Occupied(index) => Some(self.remove_at(index)),
            Probe::Vacant(_) => None,
        }
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// Allocates the slot array if the table has none yet.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use shift_hash::hash_table::Entry;
    /// # use shift_hash::hash_table::HashTable;
    /// # use shift_hash::key::hash_u64;
    /// #
    /// let mut table = HashTable::new();
    /// let hash = hash_u64(7);
    ///
    /// match table.entry(hash, |&(k, _): &(u64, &str)| k == 7) {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert((7, "seven"));
    ///     }
    ///     Entry::Occupied(mut entry) => {
    ///         entry.get_mut().1 = "updated";
    ///     }
    /// }
    ///
    /// assert_eq!(table.find(hash, |&(k, _)| k == 7), Some(&(7, "seven")));
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        if self.slots.is_empty() {
            self.slots = vacant_slots(MIN_CAPACITY);
        }

        let tag = tagged(hash);
        match self.probe(tag, eq) {
            Probe::Occupied(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            Probe::Vacant(index) => Entry::Vacant(VacantEntry {
                table: self,
                tag,
                index,
            }),
        }
    }

    /// Computes a histogram of probe distances for the current table state.
    ///
    /// Bin `d` counts the values stored `d` slots past their home slot.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mut hist = alloc::vec![0usize; 1];
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.is_occupied() {
                let distance = self.probe_distance(index, slot.tag);
                if hist.len() <= distance {
                    hist.resize(distance + 1, 0);
                }
                hist[distance] += 1;
            }
        }
        hist
    }

    #[cfg(any(test, feature = "stats"))]
    fn probe_distance(&self, index: usize, tag: u64) -> usize {
        let mask = self.slots.len() - 1;
        index.wrapping_sub(tag as usize & mask) & mask
    }

    /// Returns utilization and probe-length statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.slots.len();
        let mut max_probe = 0;
        let mut total_probe = 0;
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.is_occupied() {
                let distance = self.probe_distance(index, slot.tag);
                max_probe = max_probe.max(distance);
                total_probe += distance;
            }
        }

        DebugStats {
            populated: self.populated,
            capacity,
            grow_at: grow_threshold(capacity),
            shrink_at: if capacity > MIN_CAPACITY {
                shrink_threshold(capacity)
            } else {
                0
            },
            load_factor: if capacity == 0 {
                0.0
            } else {
                self.populated as f64 / capacity as f64
            },
            max_probe,
            mean_probe: if self.populated == 0 {
                0.0
            } else {
                total_probe as f64 / self.populated as f64
            },
            total_bytes: capacity * core::mem::size_of::<Slot<V>>(),
        }
    }

    /// Pretty-prints the probe-distance histogram horizontally using stdout.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_probe_histogram(&self) {
        let hist = self.probe_histogram();
        let max = *hist.iter().max().unwrap_or(&0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.populated);

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let full = units / 8;
            let rem = units % 8;
            let mut bar = "█".repeat(full);
            if rem > 0 {
                let ch = match rem {
                    1 => '▏',
                    2 => '▎',
                    3 => '▍',
                    4 => '▌',
                    5 => '▋',
                    6 => '▊',
                    7 => '▉',
                    _ => unreachable!(),
                };
                bar.push(ch);
            }
            bar
        };

        for (i, &count) in hist.iter().enumerate() {
            println!("{:>3} | {} ({})", i, make_bar(count), count);
        }
    }

    /// Asserts every structural invariant of the table.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let capacity = self.slots.len();
        let live = self.slots.iter().filter(|s| s.is_occupied()).count();
        assert_eq!(live, self.populated, "populated count drifted");

        if capacity == 0 {
            assert_eq!(self.populated, 0);
            return;
        }

        assert!(capacity.is_power_of_two());
        assert!(capacity >= MIN_CAPACITY);
        assert!(self.populated <= grow_threshold(capacity));
        assert!(capacity == MIN_CAPACITY || self.populated >= shrink_threshold(capacity));

        // Every value must be reachable from its home slot without crossing
        // an empty slot.
        let mask = capacity - 1;
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.is_occupied() {
                assert_ne!(slot.tag & TAG_BIT, 0);
                let mut cursor = slot.tag as usize & mask;
                while cursor != index {
                    assert!(
                        self.slots[cursor].is_occupied(),
                        "slot {index} unreachable from home {}",
                        slot.tag as usize & mask
                    );
                    cursor = (cursor + 1) & mask;
                }
            }
        }
    }
}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(mut self) -> Self::IntoIter {
        let slots = core::mem::take(&mut self.slots);
        self.populated = 0;
        IntoIter::from_slots(slots)
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - the value is not present in the table
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - the value is present in the table
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Vacant(entry) => entry.insert(default),
            Entry::Occupied(entry) => entry.into_mut(),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Vacant(entry) => entry.insert(default()),
            Entry::Occupied(entry) => entry.into_mut(),
        }
    }
}

/// A view into a vacant entry in a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    tag: u64,
    index: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts `value` into the table and returns a mutable reference to it.
    ///
    /// If the insert pushes the table over its load threshold, the table is
    /// rebuilt at twice the size before returning.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        let slot = &mut table.slots[self.index];
        debug_assert!(!slot.is_occupied());
        slot.value.write(value);
        slot.tag = self.tag;
        table.populated += 1;

        let mut index = self.index;
        if table.populated > grow_threshold(table.slots.len()) {
            index = table.rebuild(table.slots.len() * 2, index);
        }

        // SAFETY: `index` is where the value was written, or where the rebuild
        // moved it.
        unsafe { table.slots[index].value.assume_init_mut() }
    }
}

/// A view into an occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        // SAFETY: Occupied entries always point at an occupied slot.
        unsafe { self.table.slots[self.index].value.assume_init_ref() }
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        // SAFETY: Occupied entries always point at an occupied slot.
        unsafe { self.table.slots[self.index].value.assume_init_mut() }
    }

    /// Converts the entry into a mutable reference to the value, bound to
    /// the table's lifetime.
    pub fn into_mut(self) -> &'a mut V {
        // SAFETY: Occupied entries always point at an occupied slot.
        unsafe { self.table.slots[self.index].value.assume_init_mut() }
    }

    /// Removes the value from the table and returns it.
    pub fn remove(self) -> V {
        self.table.remove_at(self.index)
    }
}

/// An iterator over live tags and values, in slot order.
pub(crate) struct TaggedIter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<V> Clone for TaggedIter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for TaggedIter<'a, V> {
    type Item = (u64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if slot.is_occupied() {
                self.remaining -= 1;
                // SAFETY: An occupied tag guarantees an initialized value.
                return Some((slot.tag, unsafe { slot.value.assume_init_ref() }));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for TaggedIter<'_, V> {}

/// An iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter`](HashTable::iter) method.
pub struct Iter<'a, V> {
    inner: TaggedIter<'a, V>,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// A mutable iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter_mut`](HashTable::iter_mut) method.
pub struct IterMut<'a, V> {
    slots: core::slice::IterMut<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if slot.is_occupied() {
                self.remaining -= 1;
                // SAFETY: An occupied tag guarantees an initialized value.
                return Some(unsafe { slot.value.assume_init_mut() });
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

/// An owning iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    slots: alloc::vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V> IntoIter<V> {
    fn from_slots(slots: Vec<Slot<V>>) -> Self {
        let remaining = slots.iter().filter(|slot| slot.is_occupied()).count();
        Self {
            slots: slots.into_iter(),
            remaining,
        }
    }
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if slot.is_occupied() {
                self.remaining -= 1;
                // SAFETY: The slot left the table, so its value is moved out
                // exactly once.
                return Some(unsafe { slot.value.assume_init() });
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> Drop for IntoIter<V> {
    fn drop(&mut self) {
        for _ in &mut *self {}
    }
}
