//! Insertion-ordered hash containers.
//!
//! [`IndexMap`] keeps its entries in a `Vec` and indexes them through a
//! [`HashTable`] of positions, so lookups are hashed while iteration follows
//! insertion order. Entries are never removed, which keeps positions stable.

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::mem;
use core::slice;

use crate::hash::{HashTable, hash_one};

// -----------------------------------------------------------------------------
// IndexMap

#[derive(Clone)]
struct Bucket<K, V> {
    hash: u64,
    key: K,
    value: V,
}

/// A hash map that iterates in insertion order.
///
/// Re-inserting an existing key replaces its value but keeps its position.
///
/// # Examples
///
/// ```
/// use vc_collections::IndexMap;
///
/// let mut map = IndexMap::new();
/// map.insert("b", 1);
/// map.insert("a", 2);
/// map.insert("b", 3);
///
/// let entries: Vec<_> = map.iter().collect();
/// assert_eq!(entries, [(&"b", &3), (&"a", &2)]);
/// ```
#[derive(Clone)]
pub struct IndexMap<K, V> {
    entries: Vec<Bucket<K, V>>,
    indices: HashTable<usize>,
}

impl<K, V> IndexMap<K, V> {
    /// Creates an empty map.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            indices: HashTable::new(),
        }
    }

    /// Creates an empty map with room for `capacity` entries.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            indices: HashTable::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at insertion position `index`.
    #[inline]
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.entries.get(index).map(|b| (&b.key, &b.value))
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter(self.entries.iter())
    }

    #[inline]
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.entries.iter().map(|b| &b.key)
    }

    #[inline]
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.entries.iter().map(|b| &b.value)
    }

    #[inline]
    pub fn values_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut V> + ExactSizeIterator {
        self.entries.iter_mut().map(|b| &mut b.value)
    }
}

impl<K: Hash + Eq, V> IndexMap<K, V> {
    fn find(&self, hash: u64, key: &K) -> Option<usize> {
        let entries = &self.entries;
        self.indices
            .find(hash, |&i| entries[i].key == *key)
            .copied()
    }

    fn push(&mut self, hash: u64, key: K, value: V) -> usize {
        let index = self.entries.len();
        self.entries.push(Bucket { hash, key, value });
        let entries = &self.entries;
        self.indices
            .insert_unique(hash, index, |&i| entries[i].hash);
        index
    }

    /// Returns the insertion position of `key`.
    #[inline]
    pub fn get_index_of(&self, key: &K) -> Option<usize> {
        self.find(hash_one(key), key)
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get_index_of(key).is_some()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let index = self.get_index_of(key)?;
        Some(&self.entries[index].value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.get_index_of(key)?;
        Some(&mut self.entries[index].value)
    }

    /// Inserts `value` under `key`, returning the replaced value if the key
    /// was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = hash_one(&key);
        match self.find(hash, &key) {
            Some(index) => Some(mem::replace(&mut self.entries[index].value, value)),
            None => {
                self.push(hash, key, value);
                None
            }
        }
    }

    /// Inserts `value` under `key` only if the key is absent.
    ///
    /// On conflict the rejected pair is handed back.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<usize, (K, V)> {
        let hash = hash_one(&key);
        match self.find(hash, &key) {
            Some(_) => Err((key, value)),
            None => Ok(self.push(hash, key, value)),
        }
    }

    /// Returns the value of `key`, inserting `default()` first if absent.
    pub fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &mut V {
        let hash = hash_one(&key);
        let index = match self.find(hash, &key) {
            Some(index) => index,
            None => self.push(hash, key, default()),
        };
        &mut self.entries[index].value
    }
}

impl<K, V> Default for IndexMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IndexMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for IndexMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Hash + Eq, V: Eq> Eq for IndexMap<K, V> {}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for IndexMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity(iter.size_hint().0);
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq, V> Extend<(K, V)> for IndexMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a IndexMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for IndexMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.entries.into_iter())
    }
}

/// Borrowing iterator over an [`IndexMap`], in insertion order.
pub struct Iter<'a, K, V>(slice::Iter<'a, Bucket<K, V>>);

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|b| (&b.key, &b.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|b| (&b.key, &b.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Owning iterator over an [`IndexMap`], in insertion order.
pub struct IntoIter<K, V>(alloc::vec::IntoIter<Bucket<K, V>>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|b| (b.key, b.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

// -----------------------------------------------------------------------------
// IndexSet

/// A hash set that iterates in insertion order.
///
/// # Examples
///
/// ```
/// use vc_collections::IndexSet;
///
/// let set: IndexSet<_> = [3, 1, 3, 2].into_iter().collect();
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 1, 2]);
/// ```
#[derive(Clone, Default)]
pub struct IndexSet<T> {
    map: IndexMap<T, ()>,
}

impl<T> IndexSet<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            map: IndexMap::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: IndexMap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.map.get_index(index).map(|(k, _)| k)
    }

    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.map.keys()
    }
}

impl<T: Hash + Eq> IndexSet<T> {
    /// Adds `value`, returning `false` if it was already present.
    #[inline]
    pub fn insert(&mut self, value: T) -> bool {
        self.map.try_insert(value, ()).is_ok()
    }

    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.map.contains_key(value)
    }

    #[inline]
    pub fn get_index_of(&self, value: &T) -> Option<usize> {
        self.map.get_index_of(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for IndexSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Hash + Eq> PartialEq for IndexSet<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T: Hash + Eq> Eq for IndexSet<T> {}

impl<T: Hash + Eq> FromIterator<T> for IndexSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity(iter.size_hint().0);
        set.extend(iter);
        set
    }
}

impl<T: Hash + Eq> Extend<T> for IndexSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> IntoIterator for IndexSet<T> {
    type Item = T;
    type IntoIter = core::iter::Map<IntoIter<T, ()>, fn((T, ())) -> T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter().map(first::<T> as fn((T, ())) -> T)
    }
}

#[inline(always)]
fn first<T>((key, ()): (T, ())) -> T {
    key
}

#[cfg(test)]
mod tests {
    use super::{IndexMap, IndexSet};
    use alloc::vec::Vec;

    #[test]
    fn insertion_order_survives_growth() {
        let map: IndexMap<u32, u32> = (0..200).rev().map(|i| (i, i * 2)).collect();
        assert_eq!(map.len(), 200);
        assert_eq!(map.get_index(0), Some((&199, &398)));
        assert_eq!(map.get(&7), Some(&14));
        assert!(map.keys().copied().eq((0..200).rev()));
    }

    #[test]
    fn try_insert_keeps_first() {
        let mut map = IndexMap::new();
        assert_eq!(map.try_insert("a", 1), Ok(0));
        assert_eq!(map.try_insert("a", 2), Err(("a", 2)));
        assert_eq!(map.get(&"a"), Some(&1));
    }

    #[test]
    fn equality_ignores_order() {
        let a: IndexMap<_, _> = [(1, 'a'), (2, 'b')].into_iter().collect();
        let b: IndexMap<_, _> = [(2, 'b'), (1, 'a')].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn set_deduplicates() {
        let mut set = IndexSet::new();
        assert!(set.insert("x"));
        assert!(set.insert("y"));
        assert!(!set.insert("x"));
        assert_eq!(set.get_index_of(&"y"), Some(1));
        assert_eq!(set.into_iter().collect::<Vec<_>>(), ["x", "y"]);
    }
}
