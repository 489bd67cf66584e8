use core::fmt::Debug;
use core::ops::Index;

use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::key::HashKey;

/// A hash map implemented using the linear-probing [`HashTable`] as the
/// underlying storage.
///
/// `HashMap<K, V>` stores key-value pairs where keys implement [`HashKey`].
/// A default-constructed map owns no memory; the slot array is allocated on
/// the first insert.
///
/// Iteration visits entries in slot order, which is neither insertion order
/// nor stable across runs of the program.
///
/// The map is not synchronized. Share it across threads only behind a lock.
#[derive(Clone)]
pub struct HashMap<K, V> {
    table: HashTable<(K, V)>,
}

impl<K, V> Debug for HashMap<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V> HashMap<K, V> {
    /// Creates an empty map without allocating.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashMap;
    ///
    /// let map: HashMap<u64, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 0);
    /// ```
    pub const fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1u32, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all key-value pairs and releases the table's memory.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over key-value pairs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1u32, 10);
    /// map.insert(2u32, 20);
    ///
    /// let total: i32 = map.iter().map(|(_, v)| v).sum();
    /// assert_eq!(total, 30);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over key-value pairs with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values of the map.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Calls `f` on every key-value pair, stopping at the first error.
    ///
    /// The error is returned to the caller unchanged and no further pairs are
    /// visited.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// for i in 0u32..10 {
    ///     map.insert(i, i * 2);
    /// }
    ///
    /// let mut sum = 0;
    /// map.try_for_each(|_, v| {
    ///     sum += *v;
    ///     Ok::<(), ()>(())
    /// })
    /// .unwrap();
    /// assert_eq!(sum, 90);
    ///
    /// let err = map.try_for_each(|k, _| if *k == 7 { Err(*k) } else { Ok(()) });
    /// assert_eq!(err, Err(7));
    /// ```
    pub fn try_for_each<E>(&self, mut f: impl FnMut(&K, &V) -> Result<(), E>) -> Result<(), E> {
        for (k, v) in self.iter() {
            f(k, v)?;
        }
        Ok(())
    }

    /// Returns utilization and probe-length statistics for the map's table.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Returns a histogram of probe distances for the map's table.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> alloc::vec::Vec<usize> {
        self.table.probe_histogram()
    }

    /// Pretty-prints the probe-distance histogram of the map's table.
    #[cfg(all(feature = "stats", feature = "std"))]
    pub fn print_probe_histogram(&self) {
        self.table.print_probe_histogram();
    }
}

impl<K, V> HashMap<K, V>
where
    K: HashKey,
{
    /// Returns a reference to the value for `key`, or `None` if the key is
    /// absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert("one".to_string(), 1);
    /// assert_eq!(map.get(&"one".to_string()), Some(&1));
    /// assert_eq!(map.get(&"two".to_string()), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.table
            .find(key.hash_key(), |(k, _)| k.key_eq(key))
            .map(|(_, v)| v)
    }

    /// Returns the stored key and its value.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.table
            .find(key.hash_key(), |(k, _)| k.key_eq(key))
            .map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.table
            .find_mut(key.hash_key(), |(k, _)| k.key_eq(key))
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key was already present its value is replaced and the old
    /// value returned; the stored key is kept. Otherwise `None` is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert(37u64, "a"), None);
    /// assert_eq!(map.insert(37u64, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.table.entry(key.hash_key(), |(k, _)| k.key_eq(&key)) {
            TableEntry::Occupied(mut entry) => {
                Some(core::mem::replace(&mut entry.get_mut().1, value))
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                None
            }
        }
    }

    /// Removes `key` from the map, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1u8, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key` from the map, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.table.remove(key.hash_key(), |(k, _)| k.key_eq(key))
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashMap;
    ///
    /// let mut counts: HashMap<char, usize> = HashMap::new();
    /// for c in "hello".chars() {
    ///     *counts.entry(c).or_insert(0) += 1;
    /// }
    /// assert_eq!(counts[&'l'], 2);
    /// assert_eq!(counts[&'h'], 1);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        match self.table.entry(key.hash_key(), |(k, _)| k.key_eq(&key)) {
            TableEntry::Occupied(inner) => Entry::Occupied(OccupiedEntry { inner }),
            TableEntry::Vacant(inner) => Entry::Vacant(VacantEntry { key, inner }),
        }
    }
}

impl<K, V> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> PartialEq for HashMap<K, V>
where
    K: HashKey,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter()
            .all(|(k, v)| other.get(k).is_some_and(|other_v| v == other_v))
    }
}

impl<K, V> Eq for HashMap<K, V>
where
    K: HashKey,
    V: Eq,
{
}

impl<K, V> Index<&K> for HashMap<K, V>
where
    K: HashKey,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found in HashMap")
    }
}

impl<K, V> FromIterator<(K, V)> for HashMap<K, V>
where
    K: HashKey,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HashMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for HashMap<K, V>
where
    K: HashKey,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> IntoIterator for HashMap<K, V> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a HashMap<K, V> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut HashMap<K, V> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in a map, which may be vacant or occupied.
///
/// This enum is constructed from the [`entry`](HashMap::entry) method on
/// [`HashMap`].
pub enum Entry<'a, K, V> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Calls `f` on the value if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns the entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into an occupied entry in a [`HashMap`].
pub struct OccupiedEntry<'a, K, V> {
    inner: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Returns the stored key.
    pub fn key(&self) -> &K {
        &self.inner.get().0
    }

    /// Returns a reference to the value.
    pub fn get(&self) -> &V {
        &self.inner.get().1
    }

    /// Returns a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.inner.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.inner.into_mut().1
    }

    /// Replaces the value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the map and returns its value.
    pub fn remove(self) -> V {
        self.inner.remove().1
    }

    /// Removes the entry from the map and returns the stored key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.inner.remove()
    }
}

/// A view into a vacant entry in a [`HashMap`].
pub struct VacantEntry<'a, K, V> {
    key: K,
    inner: crate::hash_table::VacantEntry<'a, (K, V)>,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Returns the key that would be inserted.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key without inserting.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.inner.insert((self.key, value)).1
    }
}

/// An iterator over the entries of a [`HashMap`].
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of a [`HashMap`].
pub struct IterMut<'a, K, V> {
    inner: crate::hash_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of a [`HashMap`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the values of a [`HashMap`].
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A mutable iterator over the values of a [`HashMap`].
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A consuming iterator over the entries of a [`HashMap`].
pub struct IntoIter<K, V> {
    inner: crate::hash_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::hash::Hasher;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use rand::rngs::SmallRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::key::KeyHasher;

    #[test]
    fn zero_value_is_queryable() {
        let mut map: HashMap<u64, u64> = HashMap::default();
        assert_eq!(map.len(), 0);
        assert_eq!(map.get(&1), None);
        assert_eq!(map.remove(&1), None);
        assert!(map.iter().next().is_none());
        assert_eq!(map.capacity(), 0);
    }

    #[test]
    fn insert_remove_scenario() {
        let mut map = HashMap::new();
        for i in 0..100u64 {
            map.insert(i, i * 2);
        }
        assert_eq!(map.len(), 100);
        for i in 0..100u64 {
            assert_eq!(map.get(&i), Some(&(i * 2)), "key {i}");
        }

        for i in (0..100u64).step_by(2) {
            map.remove(&i);
        }
        assert_eq!(map.len(), 50);
        assert_eq!(map.get(&0), None);
        assert_eq!(map.get(&1), Some(&2));
        map.table.check_invariants();
    }

    #[test]
    fn insert_updates_in_place() {
        let mut map = HashMap::new();
        assert_eq!(map.insert("k".to_string(), 1), None);
        assert_eq!(map.insert("k".to_string(), 2), Some(1));
        assert_eq!(map.len(), 1);
        assert_eq!(map[&"k".to_string()], 2);
    }

    #[test]
    fn insert_remove_insert_round_trip() {
        let mut map = HashMap::new();
        for i in 0..20u32 {
            map.insert(i, i);
        }
        let before = map.clone();

        map.insert(100, 100);
        map.remove(&100);
        assert_eq!(map, before);

        map.remove(&5);
        map.insert(5, 5);
        assert_eq!(map, before);
    }

    #[test]
    fn get_mut_and_values_mut() {
        let mut map: HashMap<u32, String> = (0..10).map(|i| (i, i.to_string())).collect();
        map.get_mut(&3).unwrap().push('!');
        assert_eq!(map[&3], "3!");

        for v in map.values_mut() {
            v.push('?');
        }
        assert_eq!(map[&3], "3!?");
        assert_eq!(map[&4], "4?");

        for (k, v) in &mut map {
            if *k == 0 {
                v.clear();
            }
        }
        assert_eq!(map[&0], "");
    }

    #[test]
    fn try_for_each_visits_all_or_stops() {
        let map: HashMap<u64, u64> = (0..50).map(|i| (i, i)).collect();

        let mut seen = Vec::new();
        let result: Result<(), ()> = map.try_for_each(|k, _| {
            seen.push(*k);
            Ok(())
        });
        assert!(result.is_ok());
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());

        let mut visited = 0;
        let result = map.try_for_each(|_, _| {
            visited += 1;
            if visited == 3 { Err("stop") } else { Ok(()) }
        });
        assert_eq!(result, Err("stop"));
        assert_eq!(visited, 3);
    }

    #[test]
    fn clone_is_independent() {
        let mut original: HashMap<u64, u64> = (0..30).map(|i| (i, i)).collect();
        let copy = original.clone();
        assert_eq!(copy.len(), 30);
        assert_eq!(copy.capacity(), original.capacity());

        original.insert(0, 1000);
        original.remove(&1);
        original.insert(99, 99);

        assert_eq!(copy[&0], 0);
        assert_eq!(copy.get(&1), Some(&1));
        assert_eq!(copy.get(&99), None);
        assert_eq!(copy.len(), 30);
    }

    #[test]
    fn entry_api() {
        let mut map: HashMap<String, u32> = HashMap::new();
        *map.entry("a".to_string()).or_default() += 1;
        *map.entry("a".to_string()).or_default() += 1;
        map.entry("b".to_string()).or_insert_with(|| 10);
        map.entry("b".to_string()).and_modify(|v| *v *= 2).or_insert(0);
        map.entry("c".to_string()).and_modify(|v| *v *= 2).or_insert(7);

        assert_eq!(map[&"a".to_string()], 2);
        assert_eq!(map[&"b".to_string()], 20);
        assert_eq!(map[&"c".to_string()], 7);

        match map.entry("a".to_string()) {
            Entry::Occupied(mut o) => {
                assert_eq!(o.key(), "a");
                assert_eq!(o.insert(5), 2);
                assert_eq!(o.remove(), 5);
            }
            Entry::Vacant(_) => panic!("a should be present"),
        }
        assert!(!map.contains_key(&"a".to_string()));

        match map.entry("z".to_string()) {
            Entry::Vacant(v) => assert_eq!(v.into_key(), "z"),
            Entry::Occupied(_) => panic!("z should be absent"),
        }
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn randomized_against_model() {
        let seed = OsRng.try_next_u64().unwrap_or(0);
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut map = HashMap::new();
        let mut model = BTreeMap::new();

        for step in 0..10_000u32 {
            let key = rng.random_range(0..500u32);
            match rng.random_range(0..3) {
                0 | 1 => assert_eq!(map.insert(key, step), model.insert(key, step), "seed {seed}"),
                _ => assert_eq!(map.remove(&key), model.remove(&key), "seed {seed}"),
            }
            assert_eq!(map.len(), model.len());
        }

        map.table.check_invariants();
        let mut pairs: Vec<(u32, u32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, model.into_iter().collect::<Vec<_>>(), "seed {seed}");
    }

    #[test]
    fn into_iter_and_debug() {
        let map: HashMap<u8, &str> = [(1, "one")].into_iter().collect();
        assert_eq!(format!("{:?}", map), "{1: \"one\"}");

        let pairs: Vec<(u8, &str)> = map.into_iter().collect();
        assert_eq!(pairs, [(1, "one")]);
    }

    // A composite key hashed with its own keyed SipHasher instead of
    // KeyHasher, as an external key type might do.
    #[derive(Debug, Clone)]
    struct BigKey {
        parts: [String; 5],
        k0: u64,
        k1: u64,
    }

    impl HashKey for BigKey {
        fn hash_key(&self) -> u64 {
            let mut h = SipHasher::new_with_keys(self.k0, self.k1);
            for part in &self.parts {
                h.write(part.as_bytes());
                h.write_u8(0xff);
            }
            h.finish()
        }

        fn key_eq(&self, other: &Self) -> bool {
            self.parts == other.parts
        }
    }

    #[test]
    fn user_defined_composite_keys() {
        let k0 = OsRng.try_next_u64().unwrap_or(3);
        let k1 = OsRng.try_next_u64().unwrap_or(4);
        let make = |i: u64| BigKey {
            parts: [
                format!("{}", i),
                format!("{}", i * 2),
                format!("{}", i * 3),
                format!("{}", i * 5),
                format!("{}", i * 7),
            ],
            k0,
            k1,
        };

        let mut map = HashMap::new();
        for i in 0..1000 {
            map.insert(make(i), i);
        }
        assert_eq!(map.len(), 1000);
        for i in 0..1000 {
            assert_eq!(map.get(&make(i)), Some(&i));
        }
        assert_eq!(map.get(&make(1000)), None);
    }

    #[test]
    fn tuple_and_byte_keys() {
        let mut map = HashMap::new();
        map.insert((1u32, "a".to_string()), 1);
        map.insert((1u32, "b".to_string()), 2);
        map.insert((2u32, "a".to_string()), 3);
        assert_eq!(map.len(), 3);
        assert_eq!(map[&(1, "b".to_string())], 2);

        let mut bytes = HashMap::new();
        bytes.insert(crate::key::Bytes(b"abc".to_vec()), 1);
        bytes.insert(crate::key::Bytes::from(&b"abc"[..]), 2);
        assert_eq!(bytes.len(), 1);
        assert_eq!(bytes[&crate::key::Bytes(b"abc".to_vec())], 2);
    }

    #[test]
    fn key_hasher_for_custom_struct() {
        struct Pair(u64, u64);

        impl HashKey for Pair {
            fn hash_key(&self) -> u64 {
                let mut h = KeyHasher::new();
                h.write_key(&self.0);
                h.write_key(&self.1);
                h.finish()
            }

            fn key_eq(&self, other: &Self) -> bool {
                self.0 == other.0 && self.1 == other.1
            }
        }

        let mut map = HashMap::new();
        map.insert(Pair(1, 2), "12");
        map.insert(Pair(2, 1), "21");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&Pair(1, 2)), Some(&"12"));
        assert_eq!(map.get(&Pair(2, 1)), Some(&"21"));
    }

    #[test]
    fn clear_releases_memory() {
        let mut map: HashMap<u64, u64> = (0..100).map(|i| (i, i)).collect();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), 0);
        map.insert(1, 1);
        assert_eq!(map.capacity(), 16);
    }
}
