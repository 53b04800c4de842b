//! Classification of raw classes into [`Family`] values.
//!
//! Each resolver owns an ordered list of [`Chain`]s. A chain applies when the
//! class is assignable to its umbrella; its rules are then tried most
//! specific first, and if none matches the chain's [`Terminal`] decides.
//! Chains never fall through to the next chain once their umbrella matched.

use crate::family::{
    BiMapKind, Family, ImmutableMapKind, ListMultimapKind, MultisetKind, SetMultimapKind,
    WrapperKind,
};
use crate::info::{RawClass, classes};

// -----------------------------------------------------------------------------
// Chain

/// A subtype test and the family it selects.
#[derive(Debug)]
pub struct Rule {
    pub class: &'static RawClass,
    pub family: Family,
}

/// What a chain yields when none of its rules match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// A documented default family.
    Default(Family),
    /// The umbrella is recognised but nothing is selected.
    NotHandled,
}

/// An umbrella class with ordered rules and an explicit terminal.
#[derive(Debug)]
pub struct Chain {
    pub umbrella: &'static RawClass,
    pub rules: &'static [Rule],
    pub terminal: Terminal,
}

impl Chain {
    /// `None` if the umbrella does not apply; otherwise the chain's decision.
    pub fn classify(&self, raw: &RawClass) -> Option<Option<Family>> {
        if !raw.is_assignable_to(self.umbrella) {
            return None;
        }
        let family = match self.rules.iter().find(|r| raw.is_assignable_to(r.class)) {
            Some(rule) => Some(rule.family),
            None => match self.terminal {
                Terminal::Default(family) => Some(family),
                Terminal::NotHandled => None,
            },
        };
        Some(family)
    }
}

const fn rule(class: &'static RawClass, family: Family) -> Rule {
    Rule { class, family }
}

fn classify_chains(chains: &[Chain], raw: &RawClass) -> Option<Family> {
    chains.iter().find_map(|c| c.classify(raw)).flatten()
}

// -----------------------------------------------------------------------------
// Sequences

pub static COLLECTION_CHAINS: [Chain; 2] = [
    Chain {
        umbrella: &classes::IMMUTABLE_COLLECTION,
        rules: &[
            rule(&classes::IMMUTABLE_SORTED_SET, Family::ImmutableOrderedSet),
            rule(&classes::IMMUTABLE_MULTISET, Family::ImmutableMultiset),
            rule(&classes::IMMUTABLE_SET, Family::ImmutableSet),
            rule(&classes::IMMUTABLE_LIST, Family::ImmutableSequence),
        ],
        terminal: Terminal::Default(Family::ImmutableSequence),
    },
    Chain {
        umbrella: &classes::MULTISET,
        rules: &[
            rule(
                &classes::LINKED_HASH_MULTISET,
                Family::Multiset(MultisetKind::InsertionOrdered),
            ),
            rule(
                &classes::HASH_MULTISET,
                Family::Multiset(MultisetKind::Hashed),
            ),
            rule(
                &classes::ENUM_MULTISET,
                Family::Multiset(MultisetKind::EnumKeyed),
            ),
            rule(
                &classes::TREE_MULTISET,
                Family::Multiset(MultisetKind::Sorted),
            ),
        ],
        terminal: Terminal::Default(Family::Multiset(MultisetKind::Hashed)),
    },
];

/// Classifies a sequence or multiset class.
///
/// # Examples
///
/// ```
/// use vc_collect_de::family::{Family, MultisetKind};
/// use vc_collect_de::info::{RawClass, classes};
/// use vc_collect_de::taxonomy::classify_collection;
///
/// static BAG: RawClass = RawClass::new("app::Bag", &[&classes::MULTISET]);
///
/// assert_eq!(
///     classify_collection(&classes::IMMUTABLE_SORTED_SET),
///     Some(Family::ImmutableOrderedSet)
/// );
/// assert_eq!(classify_collection(&BAG), Some(Family::Multiset(MultisetKind::Hashed)));
/// assert_eq!(classify_collection(&classes::VEC), None);
/// ```
pub fn classify_collection(raw: &RawClass) -> Option<Family> {
    classify_chains(&COLLECTION_CHAINS, raw)
}

// -----------------------------------------------------------------------------
// Maps

pub static MAP_CHAINS: [Chain; 2] = [
    Chain {
        umbrella: &classes::IMMUTABLE_MAP,
        rules: &[
            rule(
                &classes::IMMUTABLE_SORTED_MAP,
                Family::ImmutableMap(ImmutableMapKind::Sorted),
            ),
            rule(
                &classes::IMMUTABLE_BI_MAP,
                Family::ImmutableMap(ImmutableMapKind::Bidirectional),
            ),
        ],
        terminal: Terminal::Default(Family::ImmutableMap(ImmutableMapKind::Plain)),
    },
    Chain {
        umbrella: &classes::BI_MAP,
        rules: &[
            rule(
                &classes::ENUM_BI_MAP,
                Family::BidirectionalMap(BiMapKind::EnumKeyed),
            ),
            rule(
                &classes::ENUM_HASH_BI_MAP,
                Family::BidirectionalMap(BiMapKind::EnumHashed),
            ),
            rule(
                &classes::HASH_BI_MAP,
                Family::BidirectionalMap(BiMapKind::Hashed),
            ),
        ],
        terminal: Terminal::NotHandled,
    },
];

/// Classifies a map class. Plain mutable maps yield `None`.
pub fn classify_map(raw: &RawClass) -> Option<Family> {
    classify_chains(&MAP_CHAINS, raw)
}

// -----------------------------------------------------------------------------
// Map-like

pub static MAP_LIKE_CHAINS: [Chain; 4] = [
    Chain {
        umbrella: &classes::LIST_MULTIMAP,
        rules: &[
            rule(
                &classes::IMMUTABLE_LIST_MULTIMAP,
                Family::ListMultimap(ListMultimapKind::Immutable),
            ),
            rule(
                &classes::ARRAY_LIST_MULTIMAP,
                Family::ListMultimap(ListMultimapKind::ArrayBacked),
            ),
            rule(
                &classes::LINKED_LIST_MULTIMAP,
                Family::ListMultimap(ListMultimapKind::Linked),
            ),
            rule(
                &classes::FORWARDING_LIST_MULTIMAP,
                Family::ListMultimap(ListMultimapKind::Forwarding),
            ),
        ],
        terminal: Terminal::Default(Family::ListMultimap(ListMultimapKind::ArrayBacked)),
    },
    Chain {
        umbrella: &classes::SET_MULTIMAP,
        rules: &[
            rule(
                &classes::TREE_MULTIMAP,
                Family::SetMultimap(SetMultimapKind::Tree),
            ),
            rule(
                &classes::FORWARDING_SORTED_SET_MULTIMAP,
                Family::SetMultimap(SetMultimapKind::ForwardingSorted),
            ),
            rule(
                &classes::IMMUTABLE_SET_MULTIMAP,
                Family::SetMultimap(SetMultimapKind::Immutable),
            ),
            rule(
                &classes::HASH_MULTIMAP,
                Family::SetMultimap(SetMultimapKind::Hashed),
            ),
            rule(
                &classes::LINKED_HASH_MULTIMAP,
                Family::SetMultimap(SetMultimapKind::LinkedHashed),
            ),
            rule(
                &classes::FORWARDING_SET_MULTIMAP,
                Family::SetMultimap(SetMultimapKind::Forwarding),
            ),
        ],
        terminal: Terminal::Default(Family::SetMultimap(SetMultimapKind::Hashed)),
    },
    // Provisional: a multimap that is neither list- nor set-bucketed.
    Chain {
        umbrella: &classes::MULTIMAP,
        rules: &[],
        terminal: Terminal::Default(Family::ListMultimap(ListMultimapKind::Linked)),
    },
    Chain {
        umbrella: &classes::TABLE,
        rules: &[],
        terminal: Terminal::Default(Family::Table),
    },
];

/// Classifies a multimap or table class.
pub fn classify_map_like(raw: &RawClass) -> Option<Family> {
    classify_chains(&MAP_LIKE_CHAINS, raw)
}

/// `true` if `raw` reaches the generic multimap default only because it is
/// neither list- nor set-bucketed.
pub(crate) fn is_generic_multimap(raw: &RawClass) -> bool {
    raw.is_assignable_to(&classes::MULTIMAP)
        && !raw.is_assignable_to(&classes::LIST_MULTIMAP)
        && !raw.is_assignable_to(&classes::SET_MULTIMAP)
}

// -----------------------------------------------------------------------------
// Scalar wrappers

/// Classifies a single-value wrapper; matches the exact class only.
pub fn classify_scalar(raw: &RawClass) -> Option<Family> {
    if *raw == classes::OPTIONAL {
        Some(Family::ScalarWrapper(WrapperKind::Optional))
    } else if *raw == classes::RANGE {
        Some(Family::ScalarWrapper(WrapperKind::Range))
    } else if *raw == classes::HOST_AND_PORT {
        Some(Family::ScalarWrapper(WrapperKind::HostAndPort))
    } else {
        None
    }
}

/// Classifies `raw` with every resolver's chains, in dispatch order.
pub fn classify(raw: &RawClass) -> Option<Family> {
    classify_collection(raw)
        .or_else(|| classify_map(raw))
        .or_else(|| classify_map_like(raw))
        .or_else(|| classify_scalar(raw))
}
