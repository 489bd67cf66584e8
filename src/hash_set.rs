use core::fmt::Debug;
use core::ops::BitAnd;
use core::ops::BitOr;
use core::ops::BitXor;
use core::ops::Sub;

use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::hash_table::TaggedIter;
use crate::hash_table::tagged;
use crate::key::HashKey;

/// Returns the hash every empty set reports: the tag of a fixed sentinel
/// key. It is nonzero, unlike the aggregate of an empty table.
#[inline]
fn empty_set_hash() -> u64 {
    tagged(0u64.hash_key())
}

/// A hash set implemented using the linear-probing [`HashTable`] as the
/// underlying storage.
///
/// Besides the table, the set keeps an order-independent aggregate hash: the
/// XOR of the stored tag of every element. It is updated once per element
/// added or removed, which makes [`hash`](HashSet::hash) O(1) and lets
/// equality reject most unequal sets without scanning them.
///
/// `HashSet<K>` itself implements [`HashKey`], so sets can be map keys or
/// elements of other sets. Two sets holding the same elements are the same
/// key regardless of insertion order.
///
/// Binary operations always scan the operand with fewer elements and query
/// the other one.
#[derive(Clone)]
pub struct HashSet<K> {
    table: HashTable<K>,
    hash: u64,
}

impl<K> Debug for HashSet<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K> HashSet<K> {
    /// Creates an empty set without allocating.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub const fn new() -> Self {
        Self {
            table: HashTable::new(),
            hash: 0,
        }
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all elements and releases the table's memory.
    pub fn clear(&mut self) {
        self.table.clear();
        self.hash = 0;
    }

    /// Returns an iterator over the elements of the set, in slot order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Calls `f` on every element, stopping at the first error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashSet;
    ///
    /// let set: HashSet<u32> = (1..=3).collect();
    /// let result = set.try_for_each(|v| if *v > 2 { Err(*v) } else { Ok(()) });
    /// assert_eq!(result, Err(3));
    /// ```
    pub fn try_for_each<E>(&self, mut f: impl FnMut(&K) -> Result<(), E>) -> Result<(), E> {
        for k in self.iter() {
            f(k)?;
        }
        Ok(())
    }

    /// Returns the order-independent hash of the set's contents.
    ///
    /// Equal sets have equal hashes. Every empty set reports the same
    /// nonzero sentinel. Like every key hash it depends on the process-wide
    /// seed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashSet;
    ///
    /// let a: HashSet<u32> = [1, 2, 3].into_iter().collect();
    /// let b: HashSet<u32> = [3, 2, 1].into_iter().collect();
    /// assert_eq!(a.hash(), b.hash());
    /// assert_eq!(HashSet::<u32>::new().hash(), HashSet::<String>::new().hash());
    /// ```
    pub fn hash(&self) -> u64 {
        if self.is_empty() {
            empty_set_hash()
        } else {
            self.hash
        }
    }

    /// Returns utilization and probe-length statistics for the set's table.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Returns a histogram of probe distances for the set's table.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> alloc::vec::Vec<usize> {
        self.table.probe_histogram()
    }

    /// Pretty-prints the probe-distance histogram of the set's table.
    #[cfg(all(feature = "stats", feature = "std"))]
    pub fn print_probe_histogram(&self) {
        self.table.print_probe_histogram();
    }

    fn tagged_iter(&self) -> TaggedIter<'_, K> {
        self.table.tagged_iter()
    }
}

/// Orders two sets as `(fewer elements, more elements)`.
#[inline]
fn by_len<'a, K>(a: &'a HashSet<K>, b: &'a HashSet<K>) -> (&'a HashSet<K>, &'a HashSet<K>) {
    if a.len() <= b.len() { (a, b) } else { (b, a) }
}

impl<K> HashSet<K>
where
    K: HashKey,
{
    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert_eq!(set.insert(37u32), true);
    /// assert_eq!(set.insert(37u32), false);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: K) -> bool {
        let tag = tagged(value.hash_key());
        self.insert_tagged(tag, value)
    }

    /// Removes a value from the set. Returns whether it was present.
    pub fn remove(&mut self, value: &K) -> bool {
        self.take(value).is_some()
    }

    /// Removes a value from the set and returns the stored element.
    pub fn take(&mut self, value: &K) -> Option<K> {
        let tag = tagged(value.hash_key());
        self.take_tagged(tag, value)
    }

    /// Returns `true` if the set contains `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashSet;
    ///
    /// let set: HashSet<&str> = ["a", "b"].into_iter().collect();
    /// assert!(set.contains(&"a"));
    /// assert!(!set.contains(&"c"));
    /// ```
    pub fn contains(&self, value: &K) -> bool {
        self.get(value).is_some()
    }

    /// Returns a reference to the stored element equal to `value`.
    pub fn get(&self, value: &K) -> Option<&K> {
        self.table.find(value.hash_key(), |k| k.key_eq(value))
    }

    // The aggregate changes only here and in `take_tagged`, once per element
    // that enters or leaves the set. Table rebuilds and backward shifts move
    // slots around without touching it.
    fn insert_tagged(&mut self, tag: u64, value: K) -> bool {
        match self.table.entry(tag, |k| k.key_eq(&value)) {
            TableEntry::Occupied(_) => false,
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                self.hash ^= tag;
                true
            }
        }
    }

    fn take_tagged(&mut self, tag: u64, value: &K) -> Option<K> {
        let removed = self.table.remove(tag, |k| k.key_eq(value))?;
        self.hash ^= tag;
        Some(removed)
    }

    fn contains_tagged(&self, tag: u64, value: &K) -> bool {
        self.table.find(tag, |k| k.key_eq(value)).is_some()
    }

    /// Returns `true` if every element of `self` is in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashSet;
    ///
    /// let a: HashSet<u8> = [1, 2].into_iter().collect();
    /// let b: HashSet<u8> = [1, 2, 3].into_iter().collect();
    /// assert!(a.is_subset(&b));
    /// assert!(!b.is_subset(&a));
    /// ```
    pub fn is_subset(&self, other: &HashSet<K>) -> bool {
        if self.len() > other.len() {
            return false;
        }
        self.tagged_iter().all(|(tag, k)| other.contains_tagged(tag, k))
    }

    /// Returns `true` if every element of `other` is in `self`.
    pub fn is_superset(&self, other: &HashSet<K>) -> bool {
        other.is_subset(self)
    }

    /// Returns `true` if `self` and `other` share no elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashSet;
    ///
    /// let a: HashSet<u8> = [1, 2].into_iter().collect();
    /// let b: HashSet<u8> = [3, 4].into_iter().collect();
    /// assert!(a.is_disjoint(&b));
    /// assert!(!a.is_disjoint(&a));
    /// ```
    pub fn is_disjoint(&self, other: &HashSet<K>) -> bool {
        if self.is_empty() || other.is_empty() {
            return true;
        }
        let (small, large) = by_len(self, other);
        small
            .tagged_iter()
            .all(|(tag, k)| !large.contains_tagged(tag, k))
    }
}

impl<K> HashSet<K>
where
    K: HashKey + Clone,
{
    /// Returns a new set with the elements of both sets.
    ///
    /// The larger set is copied and the smaller one's elements are added to
    /// the copy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashSet;
    ///
    /// let a: HashSet<u32> = [1, 2].into_iter().collect();
    /// let b: HashSet<u32> = [2, 3].into_iter().collect();
    /// let expected: HashSet<u32> = [1, 2, 3].into_iter().collect();
    /// assert_eq!(a.union(&b), expected);
    /// ```
    pub fn union(&self, other: &HashSet<K>) -> HashSet<K> {
        let (small, large) = by_len(self, other);
        let mut result = large.clone();
        for (tag, k) in small.tagged_iter() {
            result.insert_tagged(tag, k.clone());
        }
        result
    }

    /// Returns a new set with the elements present in both sets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashSet;
    ///
    /// let a: HashSet<u32> = [1, 2, 3].into_iter().collect();
    /// let b: HashSet<u32> = [2, 3, 4, 5].into_iter().collect();
    /// let expected: HashSet<u32> = [2, 3].into_iter().collect();
    /// assert_eq!(a.intersection(&b), expected);
    /// ```
    pub fn intersection(&self, other: &HashSet<K>) -> HashSet<K> {
        let mut result = HashSet::new();
        if self.is_empty() || other.is_empty() {
            return result;
        }
        let (small, large) = by_len(self, other);
        for (tag, k) in small.tagged_iter() {
            if large.contains_tagged(tag, k) {
                result.insert_tagged(tag, k.clone());
            }
        }
        result
    }

    /// Returns a new set with the elements of `self` that are not in
    /// `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shift_hash::HashSet;
    ///
    /// let a: HashSet<u32> = [1, 2, 3].into_iter().collect();
    /// let b: HashSet<u32> = [2, 3, 4, 5].into_iter().collect();
    /// let expected: HashSet<u32> = [1].into_iter().collect();
    /// assert_eq!(a.difference(&b), expected);
    /// ```
    pub fn difference(&self, other: &HashSet<K>) -> HashSet<K> {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }

        if self.len() <= other.len() {
            let mut result = HashSet::new();
            for (tag, k) in self.tagged_iter() {
                if !other.contains_tagged(tag, k) {
                    result.insert_tagged(tag, k.clone());
                }
            }
            result
        } else {
            let mut result = self.clone();
            for (tag, k) in other.tagged_iter() {
                result.take_tagged(tag, k);
            }
            result
        }
    }

    /// Returns a new set with the elements in exactly one of the two sets.
    pub fn symmetric_difference(&self, other: &HashSet<K>) -> HashSet<K> {
        let (small, large) = by_len(self, other);
        let mut result = large.clone();
        for (tag, k) in small.tagged_iter() {
            if result.take_tagged(tag, k).is_none() {
                result.insert_tagged(tag, k.clone());
            }
        }
        result
    }
}

impl<K> PartialEq for HashSet<K>
where
    K: HashKey,
{
    /// Sets are equal when they hold the same elements.
    ///
    /// Sizes and aggregate hashes are compared first; only sets that match on
    /// both are checked element by element, scanning the one with the
    /// smaller table.
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        if self.is_empty() {
            return true;
        }
        if self.hash() != other.hash() {
            return false;
        }

        let (small, large) = if self.capacity() <= other.capacity() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .tagged_iter()
            .all(|(tag, k)| large.contains_tagged(tag, k))
    }
}

impl<K> Eq for HashSet<K> where K: HashKey {}

impl<K> HashKey for HashSet<K>
where
    K: HashKey,
{
    #[inline]
    fn hash_key(&self) -> u64 {
        self.hash()
    }

    #[inline]
    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl<K> Default for HashSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> FromIterator<K> for HashSet<K>
where
    K: HashKey,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = HashSet::new();
        set.extend(iter);
        set
    }
}

impl<K> Extend<K> for HashSet<K>
where
    K: HashKey,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<K> IntoIterator for HashSet<K> {
    type IntoIter = IntoIter<K>;
    type Item = K;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K> IntoIterator for &'a HashSet<K> {
    type IntoIter = Iter<'a, K>;
    type Item = &'a K;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K> BitOr<&HashSet<K>> for &HashSet<K>
where
    K: HashKey + Clone,
{
    type Output = HashSet<K>;

    fn bitor(self, rhs: &HashSet<K>) -> HashSet<K> {
        self.union(rhs)
    }
}

impl<K> BitAnd<&HashSet<K>> for &HashSet<K>
where
    K: HashKey + Clone,
{
    type Output = HashSet<K>;

    fn bitand(self, rhs: &HashSet<K>) -> HashSet<K> {
        self.intersection(rhs)
    }
}

impl<K> Sub<&HashSet<K>> for &HashSet<K>
where
    K: HashKey + Clone,
{
    type Output = HashSet<K>;

    fn sub(self, rhs: &HashSet<K>) -> HashSet<K> {
        self.difference(rhs)
    }
}

impl<K> BitXor<&HashSet<K>> for &HashSet<K>
where
    K: HashKey + Clone,
{
    type Output = HashSet<K>;

    fn bitxor(self, rhs: &HashSet<K>) -> HashSet<K> {
        self.symmetric_difference(rhs)
    }
}

/// An iterator over the elements of a [`HashSet`].
pub struct Iter<'a, K> {
    inner: crate::hash_table::Iter<'a, K>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

/// A consuming iterator over the elements of a [`HashSet`].
pub struct IntoIter<K> {
    inner: crate::hash_table::IntoIter<K>,
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}
