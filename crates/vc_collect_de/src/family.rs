//! The closed taxonomy of container families.
//!
//! Every container shape the resolvers know about, including the ones they
//! deliberately leave unhandled, is a [`Family`] variant. Each family declares
//! a [`Policy`]: how it orders elements, what it does with duplicates, and
//! the shape of its contents.

use core::fmt;

// -----------------------------------------------------------------------------
// Sub-variants

/// Multiset implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultisetKind {
    Hashed,
    InsertionOrdered,
    Sorted,
    /// Enum-keyed; not implemented.
    EnumKeyed,
}

/// Immutable map implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImmutableMapKind {
    Plain,
    Sorted,
    Bidirectional,
}

/// Mutable bidirectional map implementations. None is implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiMapKind {
    Hashed,
    EnumKeyed,
    EnumHashed,
}

/// Multimaps whose buckets are lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListMultimapKind {
    ArrayBacked,
    Linked,
    /// Not implemented.
    Immutable,
    /// Not implemented.
    Forwarding,
}

/// Multimaps whose buckets are sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetMultimapKind {
    Hashed,
    LinkedHashed,
    /// Not implemented.
    Tree,
    /// Not implemented.
    ForwardingSorted,
    /// Not implemented.
    Immutable,
    /// Not implemented.
    Forwarding,
}

/// Single-value wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperKind {
    Optional,
    Range,
    HostAndPort,
}

// -----------------------------------------------------------------------------
// Family

/// A container family.
///
/// # Examples
///
/// ```
/// use vc_collect_de::family::{Duplicates, ElementOrder, Family, MultisetKind};
///
/// let family = Family::Multiset(MultisetKind::Sorted);
/// assert!(family.is_implemented());
/// assert_eq!(family.policy().order, Some(ElementOrder::Sorted));
/// assert_eq!(family.policy().duplicates, Some(Duplicates::Counted));
///
/// assert!(!Family::Multiset(MultisetKind::EnumKeyed).is_implemented());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    ImmutableSequence,
    ImmutableOrderedSet,
    ImmutableSet,
    ImmutableMultiset,
    Multiset(MultisetKind),
    /// A plain mutable map, always left to the host.
    Map,
    ImmutableMap(ImmutableMapKind),
    BidirectionalMap(BiMapKind),
    ListMultimap(ListMultimapKind),
    SetMultimap(SetMultimapKind),
    /// Not implemented.
    Table,
    ScalarWrapper(WrapperKind),
}

/// Iteration order of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementOrder {
    Insertion,
    Hashed,
    Sorted,
}

/// Treatment of equal elements (or equal bucket values for multimaps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Duplicates {
    Allowed,
    Counted,
    Forbidden,
}

/// Shape of the contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A flat run of elements.
    Elements,
    /// Each key maps to one value.
    OneToOne,
    /// One-to-one and invertible.
    Invertible,
    /// Each key maps to a list of values.
    OneToList,
    /// Each key maps to a set of values.
    OneToSet,
    /// A (row, column) pair maps to one value.
    TwoToOne,
    /// A single value.
    Single,
}

/// The declared ordering, duplicate and shape policy of a [`Family`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Policy {
    pub order: Option<ElementOrder>,
    pub duplicates: Option<Duplicates>,
    pub shape: Shape,
}

impl Policy {
    const fn new(
        order: Option<ElementOrder>,
        duplicates: Option<Duplicates>,
        shape: Shape,
    ) -> Self {
        Self {
            order,
            duplicates,
            shape,
        }
    }
}

impl Family {
    /// Whether a resolver produces a strategy for this family.
    pub const fn is_implemented(self) -> bool {
        use Family as F;
        match self {
            F::ImmutableSequence
            | F::ImmutableOrderedSet
            | F::ImmutableSet
            | F::ImmutableMultiset
            | F::ImmutableMap(_)
            | F::ScalarWrapper(_) => true,
            F::Multiset(kind) => !matches!(kind, MultisetKind::EnumKeyed),
            F::ListMultimap(kind) => matches!(
                kind,
                ListMultimapKind::ArrayBacked | ListMultimapKind::Linked
            ),
            F::SetMultimap(kind) => matches!(
                kind,
                SetMultimapKind::Hashed | SetMultimapKind::LinkedHashed
            ),
            F::Map | F::BidirectionalMap(_) | F::Table => false,
        }
    }

    /// The declared policy of this family.
    pub const fn policy(self) -> Policy {
        use Duplicates::{Allowed, Counted, Forbidden};
        use ElementOrder::{Hashed, Insertion, Sorted};
        use Family as F;

        match self {
            F::ImmutableSequence => Policy::new(Some(Insertion), Some(Allowed), Shape::Elements),
            F::ImmutableOrderedSet => Policy::new(Some(Sorted), Some(Forbidden), Shape::Elements),
            F::ImmutableSet => Policy::new(Some(Insertion), Some(Forbidden), Shape::Elements),
            F::ImmutableMultiset => Policy::new(Some(Insertion), Some(Counted), Shape::Elements),
            F::Multiset(kind) => {
                let order = match kind {
                    MultisetKind::Hashed => Hashed,
                    MultisetKind::InsertionOrdered => Insertion,
                    MultisetKind::Sorted | MultisetKind::EnumKeyed => Sorted,
                };
                Policy::new(Some(order), Some(Counted), Shape::Elements)
            }
            F::Map => Policy::new(Some(Hashed), None, Shape::OneToOne),
            F::ImmutableMap(kind) => match kind {
                ImmutableMapKind::Plain => Policy::new(Some(Insertion), None, Shape::OneToOne),
                ImmutableMapKind::Sorted => Policy::new(Some(Sorted), None, Shape::OneToOne),
                ImmutableMapKind::Bidirectional => {
                    Policy::new(Some(Insertion), None, Shape::Invertible)
                }
            },
            F::BidirectionalMap(kind) => {
                let order = match kind {
                    BiMapKind::Hashed => Hashed,
                    BiMapKind::EnumKeyed | BiMapKind::EnumHashed => Sorted,
                };
                Policy::new(Some(order), None, Shape::Invertible)
            }
            F::ListMultimap(_) => Policy::new(Some(Insertion), Some(Allowed), Shape::OneToList),
            F::SetMultimap(kind) => {
                let order = match kind {
                    SetMultimapKind::Hashed | SetMultimapKind::Forwarding => Hashed,
                    SetMultimapKind::LinkedHashed | SetMultimapKind::Immutable => Insertion,
                    SetMultimapKind::Tree | SetMultimapKind::ForwardingSorted => Sorted,
                };
                Policy::new(Some(order), Some(Forbidden), Shape::OneToSet)
            }
            F::Table => Policy::new(None, None, Shape::TwoToOne),
            F::ScalarWrapper(_) => Policy::new(None, None, Shape::Single),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::ImmutableSequence => f.write_str("immutable sequence"),
            Family::ImmutableOrderedSet => f.write_str("immutable ordered set"),
            Family::ImmutableSet => f.write_str("immutable set"),
            Family::ImmutableMultiset => f.write_str("immutable multiset"),
            Family::Multiset(kind) => write!(f, "{kind:?} multiset"),
            Family::Map => f.write_str("map"),
            Family::ImmutableMap(kind) => write!(f, "{kind:?} immutable map"),
            Family::BidirectionalMap(kind) => write!(f, "{kind:?} bidirectional map"),
            Family::ListMultimap(kind) => write!(f, "{kind:?} list multimap"),
            Family::SetMultimap(kind) => write!(f, "{kind:?} set multimap"),
            Family::Table => f.write_str("table"),
            Family::ScalarWrapper(kind) => write!(f, "{kind:?}"),
        }
    }
}
