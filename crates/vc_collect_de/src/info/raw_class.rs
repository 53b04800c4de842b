use core::fmt;
use core::hash::{Hash, Hasher};

use super::classes;

// -----------------------------------------------------------------------------
// RawClass

/// A raw (unparameterized) class and its direct supertypes.
///
/// Classes are declared as `static` items and identified by their path,
/// so two declarations with the same path are the same class.
///
/// # Examples
///
/// ```
/// use vc_collect_de::info::{RawClass, classes};
///
/// static RETRY_QUEUE: RawClass = RawClass::new(
///     "app::RetryQueue",
///     &[&classes::LINKED_HASH_MULTISET],
/// );
///
/// assert!(RETRY_QUEUE.is_assignable_to(&classes::MULTISET));
/// assert!(!RETRY_QUEUE.is_assignable_to(&classes::IMMUTABLE_COLLECTION));
/// assert_eq!(RETRY_QUEUE.name(), "RetryQueue");
/// ```
pub struct RawClass {
    path: &'static str,
    supertypes: &'static [&'static RawClass],
}

impl RawClass {
    /// Declares a class with the given direct supertypes.
    #[inline]
    pub const fn new(path: &'static str, supertypes: &'static [&'static RawClass]) -> Self {
        Self { path, supertypes }
    }

    /// The full path, e.g. `vc_collections::ImmutableList`.
    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// The last path segment.
    pub fn name(&self) -> &'static str {
        match self.path.rfind("::") {
            Some(index) => &self.path[index + 2..],
            None => self.path,
        }
    }

    #[inline]
    pub const fn supertypes(&self) -> &'static [&'static RawClass] {
        self.supertypes
    }

    /// Returns `true` if `self` is `other` or a transitive subtype of it.
    pub fn is_assignable_to(&self, other: &RawClass) -> bool {
        self == other || self.supertypes.iter().any(|s| s.is_assignable_to(other))
    }

    /// Returns `true` if values of this class have a total order.
    #[inline]
    pub fn is_orderable(&self) -> bool {
        self.is_assignable_to(&classes::ORDERABLE)
    }
}

impl PartialEq for RawClass {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self, other) || self.path == other.path
    }
}

impl Eq for RawClass {}

impl Hash for RawClass {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Debug for RawClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for RawClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use crate::info::classes;

    #[test]
    fn diamond_supertypes() {
        let sorted = &classes::IMMUTABLE_SORTED_SET;
        assert!(sorted.is_assignable_to(&classes::IMMUTABLE_SET));
        assert!(sorted.is_assignable_to(&classes::SORTED_SET));
        assert!(sorted.is_assignable_to(&classes::SET));
        assert!(sorted.is_assignable_to(&classes::IMMUTABLE_COLLECTION));
        assert!(sorted.is_assignable_to(&classes::COLLECTION));
        assert!(!sorted.is_assignable_to(&classes::LIST));
    }

    #[test]
    fn orderable_scalars() {
        assert!(classes::I64.is_orderable());
        assert!(classes::STRING.is_orderable());
        assert!(!classes::F64.is_orderable());
        assert!(!classes::UNKNOWN.is_orderable());
    }

    #[test]
    fn bidirectional_immutable_map_is_both() {
        let bimap = &classes::IMMUTABLE_BI_MAP;
        assert!(bimap.is_assignable_to(&classes::IMMUTABLE_MAP));
        assert!(bimap.is_assignable_to(&classes::BI_MAP));
        assert!(bimap.is_assignable_to(&classes::MAP));
    }
}
