#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod hash;
pub mod index;

mod bimap;
mod error;
mod host_and_port;
mod list;
mod map;
mod multimap;
mod multiset;
mod range;
mod set;

// -----------------------------------------------------------------------------
// Exports

pub use bimap::ImmutableBiMap;
pub use error::CollectError;
pub use host_and_port::HostAndPort;
pub use index::{IndexMap, IndexSet};
pub use list::ImmutableList;
pub use map::{ImmutableMap, ImmutableSortedMap};
pub use multimap::{
    ArrayListMultimap, HashMultimap, LinkedHashMultimap, LinkedListMultimap, Multimap,
};
pub use multiset::{HashMultiset, ImmutableMultiset, LinkedHashMultiset, Multiset, TreeMultiset};
pub use range::{BoundType, Range};
pub use set::{ImmutableSet, ImmutableSortedSet};
