use alloc::collections::BTreeMap;
use alloc::collections::btree_map;
use alloc::format;
use alloc::sync::Arc;
use core::fmt;
use core::hash::Hash;

use crate::error::CollectError;
use crate::index::{self, IndexMap};

// -----------------------------------------------------------------------------
// ImmutableMap

/// An immutable map iterating in insertion order.
///
/// Built with [`ImmutableMap::try_from_entries`], which rejects repeated keys.
///
/// # Examples
///
/// ```
/// use vc_collections::ImmutableMap;
///
/// let map = ImmutableMap::try_from_entries([("b", 2), ("a", 1)]).unwrap();
/// assert_eq!(map.get(&"a"), Some(&1));
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["b", "a"]);
///
/// assert!(ImmutableMap::try_from_entries([("a", 1), ("a", 2)]).is_err());
/// ```
#[derive(Clone)]
pub struct ImmutableMap<K, V> {
    entries: Arc<IndexMap<K, V>>,
}

impl<K, V> ImmutableMap<K, V> {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> index::Iter<'_, K, V> {
        self.entries.iter()
    }

    #[inline]
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.entries.keys()
    }

    #[inline]
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.entries.values()
    }

    #[inline]
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.entries.get_index(index)
    }
}

impl<K: Hash + Eq, V> ImmutableMap<K, V> {
    /// Builds a map, failing on the first repeated key.
    pub fn try_from_entries<I>(entries: I) -> Result<Self, CollectError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Debug,
    {
        let entries = entries.into_iter();
        let mut map = IndexMap::with_capacity(entries.size_hint().0);
        for (key, value) in entries {
            if let Err((key, _)) = map.try_insert(key, value) {
                return Err(CollectError::DuplicateKey(format!("{key:?}")));
            }
        }
        Ok(Self {
            entries: Arc::new(map),
        })
    }

    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }
}

impl<K, V> Default for ImmutableMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(IndexMap::new()),
        }
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for ImmutableMap<K, V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Hash + Eq, V: Eq> Eq for ImmutableMap<K, V> {}

impl<'a, K, V> IntoIterator for &'a ImmutableMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = index::Iter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ImmutableMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.entries, f)
    }
}

// -----------------------------------------------------------------------------
// ImmutableSortedMap

/// An immutable map iterating in ascending key order.
///
/// # Examples
///
/// ```
/// use vc_collections::ImmutableSortedMap;
///
/// let map = ImmutableSortedMap::try_from_entries([(3, "c"), (1, "a")]).unwrap();
/// assert_eq!(map.first_key_value(), Some((&1, &"a")));
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 3]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImmutableSortedMap<K, V> {
    entries: Arc<BTreeMap<K, V>>,
}

impl<K, V> ImmutableSortedMap<K, V> {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    #[inline]
    pub fn keys(&self) -> btree_map::Keys<'_, K, V> {
        self.entries.keys()
    }

    #[inline]
    pub fn values(&self) -> btree_map::Values<'_, K, V> {
        self.entries.values()
    }
}

impl<K: Ord, V> ImmutableSortedMap<K, V> {
    /// Builds a map, failing on the first repeated key.
    pub fn try_from_entries<I>(entries: I) -> Result<Self, CollectError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Debug,
    {
        let mut map = BTreeMap::new();
        for (key, value) in entries {
            match map.entry(key) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                btree_map::Entry::Occupied(slot) => {
                    return Err(CollectError::DuplicateKey(format!("{:?}", slot.key())));
                }
            }
        }
        Ok(Self {
            entries: Arc::new(map),
        })
    }

    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.entries.first_key_value()
    }

    #[inline]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.entries.last_key_value()
    }
}

impl<K, V> Default for ImmutableSortedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(BTreeMap::new()),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a ImmutableSortedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = btree_map::Iter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ImmutableSortedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.entries, f)
    }
}
