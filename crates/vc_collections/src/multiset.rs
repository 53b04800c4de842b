use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use core::fmt;
use core::hash::Hash;

use crate::hash::HashMap;
use crate::index::IndexMap;

// -----------------------------------------------------------------------------
// Multiset

/// A collection that counts occurrences of equal elements.
pub trait Multiset<T> {
    /// Number of occurrences of `element`, zero if absent.
    fn count(&self, element: &T) -> usize;

    /// Total number of occurrences, duplicates included.
    fn len(&self) -> usize;

    /// Number of distinct elements.
    fn distinct_len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared read API of the map-backed multisets.
macro_rules! impl_multiset {
    ($ty:ident, $($bound:tt)+) => {
        impl<T: $($bound)+> Multiset<T> for $ty<T> {
            #[inline]
            fn count(&self, element: &T) -> usize {
                self.counts.get(element).copied().unwrap_or(0)
            }

            #[inline]
            fn len(&self) -> usize {
                self.total
            }

            #[inline]
            fn distinct_len(&self) -> usize {
                self.counts.len()
            }
        }

        impl<T> $ty<T> {
            /// Iterates distinct elements with their counts.
            #[inline]
            pub fn entries(&self) -> impl Iterator<Item = (&T, usize)> {
                self.counts.iter().map(|(e, n)| (e, *n))
            }

            /// Iterates every occurrence, equal elements adjacent.
            #[inline]
            pub fn iter(&self) -> impl Iterator<Item = &T> {
                self.entries()
                    .flat_map(|(e, n)| core::iter::repeat_n(e, n))
            }
        }

        impl<T: $($bound)+> PartialEq for $ty<T> {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.total == other.total && self.counts == other.counts
            }
        }

        impl<T: $($bound)+> Eq for $ty<T> {}

        impl<T: fmt::Debug> fmt::Debug for $ty<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.entries()).finish()
            }
        }
    };
}

/// Mutation API of the map-backed multisets.
macro_rules! impl_multiset_mut {
    ($ty:ident, $($bound:tt)+) => {
        impl<T: $($bound)+> $ty<T> {
            /// Adds one occurrence, returning the previous count.
            #[inline]
            pub fn add(&mut self, element: T) -> usize {
                self.add_occurrences(element, 1)
            }
        }

        impl<T: $($bound)+> FromIterator<T> for $ty<T> {
            fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
                let mut multiset = Self::default();
                multiset.extend(iter);
                multiset
            }
        }

        impl<T: $($bound)+> Extend<T> for $ty<T> {
            fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
                for element in iter {
                    self.add(element);
                }
            }
        }
    };
}

// -----------------------------------------------------------------------------
// HashMultiset

/// A mutable multiset with hashed iteration order.
///
/// # Examples
///
/// ```
/// use vc_collections::{HashMultiset, Multiset};
///
/// let bag: HashMultiset<_> = ["a", "b", "a"].into_iter().collect();
/// assert_eq!(bag.count(&"a"), 2);
/// assert_eq!(bag.len(), 3);
/// assert_eq!(bag.distinct_len(), 2);
/// ```
#[derive(Clone)]
pub struct HashMultiset<T> {
    counts: HashMap<T, usize>,
    total: usize,
}

impl<T> Default for HashMultiset<T> {
    fn default() -> Self {
        Self {
            counts: HashMap::default(),
            total: 0,
        }
    }
}

impl<T: Hash + Eq> HashMultiset<T> {
    /// Adds `n` occurrences, returning the previous count.
    pub fn add_occurrences(&mut self, element: T, n: usize) -> usize {
        if n == 0 {
            return self.count(&element);
        }
        let slot = self.counts.entry(element).or_insert(0);
        let previous = *slot;
        *slot += n;
        self.total += n;
        previous
    }
}

impl_multiset!(HashMultiset, Hash + Eq);
impl_multiset_mut!(HashMultiset, Hash + Eq);

// -----------------------------------------------------------------------------
// LinkedHashMultiset

/// A mutable multiset iterating distinct elements in first-insertion order.
#[derive(Clone)]
pub struct LinkedHashMultiset<T> {
    counts: IndexMap<T, usize>,
    total: usize,
}

impl<T> Default for LinkedHashMultiset<T> {
    fn default() -> Self {
        Self {
            counts: IndexMap::new(),
            total: 0,
        }
    }
}

impl<T: Hash + Eq> LinkedHashMultiset<T> {
    /// Adds `n` occurrences, returning the previous count.
    pub fn add_occurrences(&mut self, element: T, n: usize) -> usize {
        if n == 0 {
            return self.count(&element);
        }
        let slot = self.counts.get_or_insert_with(element, || 0);
        let previous = *slot;
        *slot += n;
        self.total += n;
        previous
    }
}

impl_multiset!(LinkedHashMultiset, Hash + Eq);
impl_multiset_mut!(LinkedHashMultiset, Hash + Eq);

// -----------------------------------------------------------------------------
// TreeMultiset

/// A mutable multiset iterating in ascending element order.
#[derive(Clone)]
pub struct TreeMultiset<T> {
    counts: BTreeMap<T, usize>,
    total: usize,
}

impl<T> Default for TreeMultiset<T> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0,
        }
    }
}

impl<T: Ord> TreeMultiset<T> {
    /// Adds `n` occurrences, returning the previous count.
    pub fn add_occurrences(&mut self, element: T, n: usize) -> usize {
        if n == 0 {
            return self.count(&element);
        }
        let slot = self.counts.entry(element).or_insert(0);
        let previous = *slot;
        *slot += n;
        self.total += n;
        previous
    }

    /// The smallest element and its count.
    pub fn first_entry(&self) -> Option<(&T, usize)> {
        self.counts.first_key_value().map(|(e, n)| (e, *n))
    }

    /// The largest element and its count.
    pub fn last_entry(&self) -> Option<(&T, usize)> {
        self.counts.last_key_value().map(|(e, n)| (e, *n))
    }
}

impl_multiset!(TreeMultiset, Ord);
impl_multiset_mut!(TreeMultiset, Ord);

// -----------------------------------------------------------------------------
// ImmutableMultiset

/// An immutable multiset iterating distinct elements in first-insertion order.
///
/// # Examples
///
/// ```
/// use vc_collections::{ImmutableMultiset, Multiset};
///
/// let bag: ImmutableMultiset<_> = [2, 1, 2].into_iter().collect();
/// assert_eq!(bag.entries().collect::<Vec<_>>(), [(&2, 2), (&1, 1)]);
/// assert_eq!(bag.count(&2), 2);
/// ```
#[derive(Clone)]
pub struct ImmutableMultiset<T> {
    counts: Arc<IndexMap<T, usize>>,
    total: usize,
}

impl<T> Default for ImmutableMultiset<T> {
    fn default() -> Self {
        Self {
            counts: Arc::new(IndexMap::new()),
            total: 0,
        }
    }
}

impl<T: Hash + Eq> FromIterator<T> for ImmutableMultiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut counts = IndexMap::new();
        let mut total = 0;
        for element in iter {
            *counts.get_or_insert_with(element, || 0) += 1;
            total += 1;
        }
        Self {
            counts: Arc::new(counts),
            total,
        }
    }
}

impl_multiset!(ImmutableMultiset, Hash + Eq);
