use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use crate::hash::{HashMap, HashSet};
use crate::index::{IndexMap, IndexSet};

// -----------------------------------------------------------------------------
// Multimap

/// A map from each key to a bucket of values.
///
/// List-bucket multimaps keep duplicate values; set-bucket multimaps drop them.
pub trait Multimap<K, V> {
    /// Adds one entry, returning `false` if the bucket rejected it.
    fn put(&mut self, key: K, value: V) -> bool;

    /// Total number of entries across all buckets.
    fn len(&self) -> usize;

    /// Number of distinct keys.
    fn key_len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds every value of `values` under `key`, returning how many were kept.
    fn put_all<I>(&mut self, key: K, values: I) -> usize
    where
        I: IntoIterator<Item = V>,
        K: Clone,
    {
        values
            .into_iter()
            .map(|value| self.put(key.clone(), value))
            .filter(|kept| *kept)
            .count()
    }
}

macro_rules! impl_from_iter {
    ($ty:ident, $($bound:tt)+) => {
        impl<K: $($bound)+, V: $($bound)+> FromIterator<(K, V)> for $ty<K, V> {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                let mut multimap = Self::default();
                for (key, value) in iter {
                    multimap.put(key, value);
                }
                multimap
            }
        }
    };
}

// -----------------------------------------------------------------------------
// ArrayListMultimap

/// List buckets grouped by key; keys iterate in first-insertion order.
///
/// # Examples
///
/// ```
/// use vc_collections::{ArrayListMultimap, Multimap};
///
/// let map: ArrayListMultimap<_, _> = [("a", 1), ("b", 2), ("a", 1)].into_iter().collect();
/// assert_eq!(map.get(&"a"), &[1, 1]);
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.key_len(), 2);
/// ```
#[derive(Clone)]
pub struct ArrayListMultimap<K, V> {
    buckets: IndexMap<K, Vec<V>>,
    len: usize,
}

impl<K, V> Default for ArrayListMultimap<K, V> {
    fn default() -> Self {
        Self {
            buckets: IndexMap::new(),
            len: 0,
        }
    }
}

impl<K: Hash + Eq, V> Multimap<K, V> for ArrayListMultimap<K, V> {
    fn put(&mut self, key: K, value: V) -> bool {
        self.buckets.get_or_insert_with(key, Vec::new).push(value);
        self.len += 1;
        true
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn key_len(&self) -> usize {
        self.buckets.len()
    }
}

impl<K: Hash + Eq, V> ArrayListMultimap<K, V> {
    /// The bucket of `key`, empty if absent.
    pub fn get(&self, key: &K) -> &[V] {
        self.buckets.get(key).map_or(&[][..], Vec::as_slice)
    }

    pub fn contains_entry(&self, key: &K, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.get(key).contains(value)
    }
}

impl<K, V> ArrayListMultimap<K, V> {
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.buckets.keys()
    }

    /// Iterates `(key, bucket)` pairs.
    #[inline]
    pub fn buckets(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.buckets.iter().map(|(k, b)| (k, b.as_slice()))
    }

    /// Iterates every entry, grouped by key.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|(k, bucket)| bucket.iter().map(move |v| (k, v)))
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for ArrayListMultimap<K, V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.buckets == other.buckets
    }
}

impl<K: Hash + Eq, V: Eq> Eq for ArrayListMultimap<K, V> {}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for ArrayListMultimap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut multimap = Self::default();
        for (key, value) in iter {
            multimap.put(key, value);
        }
        multimap
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ArrayListMultimap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.buckets()).finish()
    }
}

// -----------------------------------------------------------------------------
// LinkedListMultimap

/// List buckets that also remember the global order of every entry.
///
/// # Examples
///
/// ```
/// use vc_collections::{LinkedListMultimap, Multimap};
///
/// let map: LinkedListMultimap<_, _> = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
/// assert_eq!(map.iter().collect::<Vec<_>>(), [(&"a", &1), (&"b", &2), (&"a", &3)]);
/// assert_eq!(map.get(&"a").collect::<Vec<_>>(), [&1, &3]);
/// ```
#[derive(Clone)]
pub struct LinkedListMultimap<K, V> {
    // (key slot in `positions`, value)
    entries: Vec<(usize, V)>,
    // key -> positions in `entries`
    positions: IndexMap<K, Vec<usize>>,
}

impl<K, V> Default for LinkedListMultimap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, V> Multimap<K, V> for LinkedListMultimap<K, V> {
    fn put(&mut self, key: K, value: V) -> bool {
        let position = self.entries.len();
        let slot = match self.positions.get_index_of(&key) {
            Some(slot) => slot,
            None => self.positions.len(),
        };
        let bucket = self.positions.get_or_insert_with(key, Vec::new);
        bucket.push(position);
        self.entries.push((slot, value));
        true
    }

    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn key_len(&self) -> usize {
        self.positions.len()
    }
}

impl<K: Hash + Eq, V> LinkedListMultimap<K, V> {
    /// Values of `key` in insertion order.
    pub fn get(&self, key: &K) -> impl Iterator<Item = &V> {
        self.positions
            .get(key)
            .into_iter()
            .flatten()
            .filter_map(|&p| self.entries.get(p).map(|(_, v)| v))
    }

    pub fn contains_entry(&self, key: &K, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.get(key).any(|v| v == value)
    }
}

impl<K, V> LinkedListMultimap<K, V> {
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.positions.keys()
    }

    /// Iterates every entry in global insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().filter_map(|(slot, value)| {
            self.positions.get_index(*slot).map(|(k, _)| (k, value))
        })
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for LinkedListMultimap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Hash + Eq, V: Eq> Eq for LinkedListMultimap<K, V> {}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for LinkedListMultimap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut multimap = Self::default();
        for (key, value) in iter {
            multimap.put(key, value);
        }
        multimap
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LinkedListMultimap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// HashMultimap

/// Set buckets in hashed order; repeated entries are dropped.
///
/// # Examples
///
/// ```
/// use vc_collections::{HashMultimap, Multimap};
///
/// let mut map = HashMultimap::default();
/// assert!(map.put("a", 1));
/// assert!(!map.put("a", 1));
/// assert!(map.put("a", 2));
/// assert_eq!(map.len(), 2);
/// assert!(map.contains_entry(&"a", &2));
/// ```
#[derive(Clone)]
pub struct HashMultimap<K, V> {
    buckets: HashMap<K, HashSet<V>>,
    len: usize,
}

impl<K, V> Default for HashMultimap<K, V> {
    fn default() -> Self {
        Self {
            buckets: HashMap::default(),
            len: 0,
        }
    }
}

impl<K: Hash + Eq, V: Hash + Eq> Multimap<K, V> for HashMultimap<K, V> {
    fn put(&mut self, key: K, value: V) -> bool {
        let added = self.buckets.entry(key).or_default().insert(value);
        if added {
            self.len += 1;
        }
        added
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn key_len(&self) -> usize {
        self.buckets.len()
    }
}

impl<K: Hash + Eq, V: Hash + Eq> HashMultimap<K, V> {
    /// The bucket of `key`, if any value was stored under it.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&HashSet<V>> {
        self.buckets.get(key)
    }

    pub fn contains_entry(&self, key: &K, value: &V) -> bool {
        self.buckets.get(key).is_some_and(|b| b.contains(value))
    }
}

impl<K, V> HashMultimap<K, V> {
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.buckets.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|(k, bucket)| bucket.iter().map(move |v| (k, v)))
    }
}

impl<K: Hash + Eq, V: Hash + Eq> PartialEq for HashMultimap<K, V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.buckets == other.buckets
    }
}

impl<K: Hash + Eq, V: Hash + Eq> Eq for HashMultimap<K, V> {}

impl_from_iter!(HashMultimap, Hash + Eq);

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashMultimap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.buckets.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// LinkedHashMultimap

/// Set buckets where keys and bucket values keep first-insertion order.
#[derive(Clone)]
pub struct LinkedHashMultimap<K, V> {
    buckets: IndexMap<K, IndexSet<V>>,
    len: usize,
}

impl<K, V> Default for LinkedHashMultimap<K, V> {
    fn default() -> Self {
        Self {
            buckets: IndexMap::new(),
            len: 0,
        }
    }
}

impl<K: Hash + Eq, V: Hash + Eq> Multimap<K, V> for LinkedHashMultimap<K, V> {
    fn put(&mut self, key: K, value: V) -> bool {
        let bucket = self.buckets.get_or_insert_with(key, IndexSet::new);
        let added = bucket.insert(value);
        if added {
            self.len += 1;
        }
        added
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn key_len(&self) -> usize {
        self.buckets.len()
    }
}

impl<K: Hash + Eq, V: Hash + Eq> LinkedHashMultimap<K, V> {
    #[inline]
    pub fn get(&self, key: &K) -> Option<&IndexSet<V>> {
        self.buckets.get(key)
    }

    pub fn contains_entry(&self, key: &K, value: &V) -> bool {
        self.buckets.get(key).is_some_and(|b| b.contains(value))
    }
}

impl<K, V> LinkedHashMultimap<K, V> {
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.buckets.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|(k, bucket)| bucket.iter().map(move |v| (k, v)))
    }
}

impl<K: Hash + Eq, V: Hash + Eq> PartialEq for LinkedHashMultimap<K, V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.buckets == other.buckets
    }
}

impl<K: Hash + Eq, V: Hash + Eq> Eq for LinkedHashMultimap<K, V> {}

impl_from_iter!(LinkedHashMultimap, Hash + Eq);

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LinkedHashMultimap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.buckets.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ArrayListMultimap, LinkedHashMultimap, LinkedListMultimap, Multimap};
    use alloc::vec::Vec;

    #[test]
    fn put_all_counts_kept_values() {
        let mut list = ArrayListMultimap::default();
        assert_eq!(list.put_all("k", [1, 1, 2]), 3);

        let mut set = LinkedHashMultimap::default();
        assert_eq!(set.put_all("k", [1, 1, 2]), 2);
        assert_eq!(set.iter().map(|(_, v)| *v).collect::<Vec<_>>(), [1, 2]);
    }

    #[test]
    fn linked_list_equality_is_order_sensitive() {
        let a: LinkedListMultimap<_, _> = [("a", 1), ("b", 2)].into_iter().collect();
        let b: LinkedListMultimap<_, _> = [("b", 2), ("a", 1)].into_iter().collect();
        assert_ne!(a, b);
        assert!(a.contains_entry(&"b", &2));
        assert_eq!(a.keys().copied().collect::<Vec<_>>(), ["a", "b"]);
    }
}
