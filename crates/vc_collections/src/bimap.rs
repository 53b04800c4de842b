use alloc::format;
use alloc::sync::Arc;
use core::fmt;
use core::hash::Hash;

use crate::error::CollectError;
use crate::hash::{HashTable, hash_one};
use crate::index::{self, IndexMap};

// -----------------------------------------------------------------------------
// ImmutableBiMap

struct Inner<K, V> {
    forward: IndexMap<K, V>,
    // Positions in `forward`, hashed by value.
    backward: HashTable<usize>,
}

/// An immutable one-to-one map that can be looked up from either side.
///
/// Keys and values are both unique; iteration follows insertion order.
///
/// # Examples
///
/// ```
/// use vc_collections::ImmutableBiMap;
///
/// let map = ImmutableBiMap::try_from_entries([("one", 1), ("two", 2)]).unwrap();
/// assert_eq!(map.get(&"two"), Some(&2));
/// assert_eq!(map.get_by_value(&1), Some(&"one"));
///
/// let inverse = map.inverse();
/// assert_eq!(inverse.get(&2), Some(&"two"));
///
/// assert!(ImmutableBiMap::try_from_entries([("a", 1), ("b", 1)]).is_err());
/// ```
pub struct ImmutableBiMap<K, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> Clone for ImmutableBiMap<K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> ImmutableBiMap<K, V> {
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.forward.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.forward.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> index::Iter<'_, K, V> {
        self.inner.forward.iter()
    }

    #[inline]
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.inner.forward.keys()
    }

    #[inline]
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.inner.forward.values()
    }
}

impl<K: Hash + Eq, V: Hash + Eq> ImmutableBiMap<K, V> {
    /// Builds a map, failing on the first repeated key or repeated value.
    pub fn try_from_entries<I>(entries: I) -> Result<Self, CollectError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Debug,
        V: fmt::Debug,
    {
        let entries = entries.into_iter();
        let mut forward: IndexMap<K, V> = IndexMap::with_capacity(entries.size_hint().0);
        let mut backward: HashTable<usize> = HashTable::with_capacity(entries.size_hint().0);

        for (key, value) in entries {
            if forward.contains_key(&key) {
                return Err(CollectError::DuplicateKey(format!("{key:?}")));
            }
            let hash = hash_one(&value);
            if find_value(&forward, &backward, hash, &value).is_some() {
                return Err(CollectError::DuplicateValue(format!("{value:?}")));
            }
            let index = forward.len();
            forward.insert(key, value);
            backward.insert_unique(hash, index, |&i| {
                forward.get_index(i).map_or(0, |(_, v)| hash_one(v))
            });
        }

        Ok(Self {
            inner: Arc::new(Inner { forward, backward }),
        })
    }

    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.inner.forward.get(key)
    }

    /// Looks up the key mapped to `value`.
    pub fn get_by_value(&self, value: &V) -> Option<&K> {
        let Inner { forward, backward } = &*self.inner;
        let index = find_value(forward, backward, hash_one(value), value)?;
        forward.get_index(index).map(|(k, _)| k)
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.forward.contains_key(key)
    }

    #[inline]
    pub fn contains_value(&self, value: &V) -> bool {
        self.get_by_value(value).is_some()
    }

    /// Returns the value-to-key view as a new map.
    pub fn inverse(&self) -> ImmutableBiMap<V, K>
    where
        K: Clone,
        V: Clone,
    {
        let mut forward = IndexMap::with_capacity(self.len());
        let mut backward = HashTable::with_capacity(self.len());
        for (index, (key, value)) in self.iter().enumerate() {
            forward.insert(value.clone(), key.clone());
            backward.insert_unique(hash_one(key), index, |&i: &usize| {
                forward
                    .get_index(i)
                    .map_or(0, |(_, k): (&V, &K)| hash_one(k))
            });
        }
        ImmutableBiMap {
            inner: Arc::new(Inner { forward, backward }),
        }
    }
}

fn find_value<K, V: Eq>(
    forward: &IndexMap<K, V>,
    backward: &HashTable<usize>,
    hash: u64,
    value: &V,
) -> Option<usize> {
    backward
        .find(hash, |&i| {
            forward.get_index(i).is_some_and(|(_, v)| v == value)
        })
        .copied()
}

impl<K, V> Default for ImmutableBiMap<K, V> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Inner {
                forward: IndexMap::new(),
                backward: HashTable::new(),
            }),
        }
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for ImmutableBiMap<K, V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner.forward == other.inner.forward
    }
}

impl<K: Hash + Eq, V: Eq> Eq for ImmutableBiMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ImmutableBiMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner.forward, f)
    }
}
