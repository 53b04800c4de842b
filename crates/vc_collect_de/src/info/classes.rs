//! Well-known raw classes.
//!
//! The container hierarchy mirrors the traits and types of `vc_collections`;
//! abstract nodes such as [`COLLECTION`] or [`SORTED_SET`] exist only to
//! express subtype relations. Applications declare their own classes with
//! [`RawClass::new`], pointing at these as supertypes.

use super::RawClass;

// -----------------------------------------------------------------------------
// Markers and scalars

/// Placeholder for a type parameter that was not resolved.
pub static UNKNOWN: RawClass = RawClass::new("unknown", &[]);

/// Marker supertype of every class with a total order.
pub static ORDERABLE: RawClass = RawClass::new("core::cmp::Ord", &[]);

pub static BOOL: RawClass = RawClass::new("bool", &[&ORDERABLE]);
pub static I64: RawClass = RawClass::new("i64", &[&ORDERABLE]);
pub static U64: RawClass = RawClass::new("u64", &[&ORDERABLE]);
/// Floats have no total order.
pub static F64: RawClass = RawClass::new("f64", &[]);
pub static STRING: RawClass = RawClass::new("alloc::string::String", &[&ORDERABLE]);

// -----------------------------------------------------------------------------
// Abstract collections

pub static COLLECTION: RawClass = RawClass::new("vc_collections::Collection", &[]);
pub static LIST: RawClass = RawClass::new("vc_collections::List", &[&COLLECTION]);
pub static SET: RawClass = RawClass::new("vc_collections::Set", &[&COLLECTION]);
pub static SORTED_SET: RawClass = RawClass::new("vc_collections::SortedSet", &[&SET]);

/// Host-default growable sequence.
pub static VEC: RawClass = RawClass::new("alloc::vec::Vec", &[&LIST]);

// -----------------------------------------------------------------------------
// Immutable collections

pub static IMMUTABLE_COLLECTION: RawClass =
    RawClass::new("vc_collections::ImmutableCollection", &[&COLLECTION]);
pub static IMMUTABLE_LIST: RawClass = RawClass::new(
    "vc_collections::ImmutableList",
    &[&IMMUTABLE_COLLECTION, &LIST],
);
pub static IMMUTABLE_SET: RawClass = RawClass::new(
    "vc_collections::ImmutableSet",
    &[&IMMUTABLE_COLLECTION, &SET],
);
pub static IMMUTABLE_SORTED_SET: RawClass = RawClass::new(
    "vc_collections::ImmutableSortedSet",
    &[&IMMUTABLE_SET, &SORTED_SET],
);

// -----------------------------------------------------------------------------
// Multisets

pub static MULTISET: RawClass = RawClass::new("vc_collections::Multiset", &[&COLLECTION]);
pub static IMMUTABLE_MULTISET: RawClass = RawClass::new(
    "vc_collections::ImmutableMultiset",
    &[&IMMUTABLE_COLLECTION, &MULTISET],
);
pub static HASH_MULTISET: RawClass = RawClass::new("vc_collections::HashMultiset", &[&MULTISET]);
pub static LINKED_HASH_MULTISET: RawClass =
    RawClass::new("vc_collections::LinkedHashMultiset", &[&MULTISET]);
pub static TREE_MULTISET: RawClass = RawClass::new("vc_collections::TreeMultiset", &[&MULTISET]);
/// Multiset keyed by enum variants; not deserializable yet.
pub static ENUM_MULTISET: RawClass = RawClass::new("vc_collections::EnumMultiset", &[&MULTISET]);

// -----------------------------------------------------------------------------
// Maps

pub static MAP: RawClass = RawClass::new("vc_collections::Map", &[]);
pub static SORTED_MAP: RawClass = RawClass::new("vc_collections::SortedMap", &[&MAP]);

/// Host-default hash map.
pub static HASH_MAP: RawClass = RawClass::new("hashbrown::HashMap", &[&MAP]);
/// Host-default ordered map.
pub static BTREE_MAP: RawClass = RawClass::new("alloc::collections::BTreeMap", &[&SORTED_MAP]);

pub static IMMUTABLE_MAP: RawClass = RawClass::new("vc_collections::ImmutableMap", &[&MAP]);
pub static IMMUTABLE_SORTED_MAP: RawClass = RawClass::new(
    "vc_collections::ImmutableSortedMap",
    &[&IMMUTABLE_MAP, &SORTED_MAP],
);

pub static BI_MAP: RawClass = RawClass::new("vc_collections::BiMap", &[&MAP]);
pub static IMMUTABLE_BI_MAP: RawClass =
    RawClass::new("vc_collections::ImmutableBiMap", &[&IMMUTABLE_MAP, &BI_MAP]);
pub static HASH_BI_MAP: RawClass = RawClass::new("vc_collections::HashBiMap", &[&BI_MAP]);
pub static ENUM_BI_MAP: RawClass = RawClass::new("vc_collections::EnumBiMap", &[&BI_MAP]);
pub static ENUM_HASH_BI_MAP: RawClass = RawClass::new("vc_collections::EnumHashBiMap", &[&BI_MAP]);

// -----------------------------------------------------------------------------
// Multimaps

pub static MULTIMAP: RawClass = RawClass::new("vc_collections::Multimap", &[]);

pub static LIST_MULTIMAP: RawClass = RawClass::new("vc_collections::ListMultimap", &[&MULTIMAP]);
pub static ARRAY_LIST_MULTIMAP: RawClass =
    RawClass::new("vc_collections::ArrayListMultimap", &[&LIST_MULTIMAP]);
pub static LINKED_LIST_MULTIMAP: RawClass =
    RawClass::new("vc_collections::LinkedListMultimap", &[&LIST_MULTIMAP]);
pub static IMMUTABLE_LIST_MULTIMAP: RawClass =
    RawClass::new("vc_collections::ImmutableListMultimap", &[&LIST_MULTIMAP]);
pub static FORWARDING_LIST_MULTIMAP: RawClass =
    RawClass::new("vc_collections::ForwardingListMultimap", &[&LIST_MULTIMAP]);

pub static SET_MULTIMAP: RawClass = RawClass::new("vc_collections::SetMultimap", &[&MULTIMAP]);
pub static SORTED_SET_MULTIMAP: RawClass =
    RawClass::new("vc_collections::SortedSetMultimap", &[&SET_MULTIMAP]);
pub static TREE_MULTIMAP: RawClass =
    RawClass::new("vc_collections::TreeMultimap", &[&SORTED_SET_MULTIMAP]);
pub static FORWARDING_SORTED_SET_MULTIMAP: RawClass = RawClass::new(
    "vc_collections::ForwardingSortedSetMultimap",
    &[&SORTED_SET_MULTIMAP],
);
pub static IMMUTABLE_SET_MULTIMAP: RawClass =
    RawClass::new("vc_collections::ImmutableSetMultimap", &[&SET_MULTIMAP]);
pub static HASH_MULTIMAP: RawClass =
    RawClass::new("vc_collections::HashMultimap", &[&SET_MULTIMAP]);
pub static LINKED_HASH_MULTIMAP: RawClass =
    RawClass::new("vc_collections::LinkedHashMultimap", &[&SET_MULTIMAP]);
pub static FORWARDING_SET_MULTIMAP: RawClass =
    RawClass::new("vc_collections::ForwardingSetMultimap", &[&SET_MULTIMAP]);

/// Two-key table; not deserializable yet.
pub static TABLE: RawClass = RawClass::new("vc_collections::Table", &[]);

// -----------------------------------------------------------------------------
// Single-value wrappers

pub static OPTIONAL: RawClass = RawClass::new("core::option::Option", &[]);
pub static RANGE: RawClass = RawClass::new("vc_collections::Range", &[]);
pub static HOST_AND_PORT: RawClass = RawClass::new("vc_collections::HostAndPort", &[]);
