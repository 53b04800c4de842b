use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use crate::index::IndexSet;

// -----------------------------------------------------------------------------
// ImmutableSet

/// An immutable set that iterates in first-insertion order.
///
/// # Examples
///
/// ```
/// use vc_collections::ImmutableSet;
///
/// let set: ImmutableSet<_> = ["b", "a", "b"].into_iter().collect();
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["b", "a"]);
/// ```
#[derive(Clone)]
pub struct ImmutableSet<T> {
    set: Arc<IndexSet<T>>,
}

impl<T> ImmutableSet<T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    #[inline]
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.set.get_index(index)
    }

    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.set.iter()
    }
}

impl<T: Hash + Eq> ImmutableSet<T> {
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.set.contains(value)
    }
}

impl<T> Default for ImmutableSet<T> {
    fn default() -> Self {
        Self {
            set: Arc::new(IndexSet::new()),
        }
    }
}

impl<T: Hash + Eq> FromIterator<T> for ImmutableSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            set: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<T: Hash + Eq> PartialEq for ImmutableSet<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.set == other.set
    }
}

impl<T: Hash + Eq> Eq for ImmutableSet<T> {}

impl<T: fmt::Debug> fmt::Debug for ImmutableSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.set, f)
    }
}

// -----------------------------------------------------------------------------
// ImmutableSortedSet

/// An immutable set kept in ascending order.
///
/// Backed by a sorted, deduplicated slice; lookups are binary searches.
///
/// # Examples
///
/// ```
/// use vc_collections::ImmutableSortedSet;
///
/// let set: ImmutableSortedSet<_> = [3, 1, 2, 2].into_iter().collect();
/// assert_eq!(set.as_slice(), &[1, 2, 3]);
/// assert_eq!(set.first(), Some(&1));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImmutableSortedSet<T> {
    items: Arc<[T]>,
}

impl<T> ImmutableSortedSet<T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The smallest element.
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// The largest element.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }
}

impl<T: Ord> ImmutableSortedSet<T> {
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.items.binary_search(value).is_ok()
    }
}

impl<T> Default for ImmutableSortedSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new().into(),
        }
    }
}

impl<T: Ord> FromIterator<T> for ImmutableSortedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut items: Vec<T> = iter.into_iter().collect();
        items.sort();
        items.dedup();
        Self {
            items: items.into(),
        }
    }
}

impl<'a, T> IntoIterator for &'a ImmutableSortedSet<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for ImmutableSortedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ImmutableSet, ImmutableSortedSet};

    #[test]
    fn set_equality_ignores_order() {
        let a: ImmutableSet<_> = [1, 2, 3].into_iter().collect();
        let b: ImmutableSet<_> = [3, 2, 1, 1].into_iter().collect();
        assert_eq!(a, b);
        assert!(b.contains(&2));
        assert_eq!(b.get_index(0), Some(&3));
    }

    #[test]
    fn sorted_set_lookup() {
        let set: ImmutableSortedSet<_> = ["pear", "apple", "fig"].into_iter().collect();
        assert!(set.contains(&"fig"));
        assert!(!set.contains(&"kiwi"));
        assert_eq!(set.last(), Some(&"pear"));
    }
}
