use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use vc_collections::{
    ArrayListMultimap, HashMultimap, HashMultiset, HostAndPort, ImmutableBiMap, ImmutableList,
    ImmutableMap, ImmutableMultiset, ImmutableSet, ImmutableSortedMap, ImmutableSortedSet,
    LinkedHashMultimap, LinkedHashMultiset, LinkedListMultimap, Range, TreeMultiset,
};

use crate::family::{Family, ImmutableMapKind, ListMultimapKind, MultisetKind, SetMultimapKind};

// -----------------------------------------------------------------------------
// Value

/// A deserialized value.
///
/// Scalars, the host's default sequences and maps, and every container the
/// strategies build. `Value` is totally ordered and hashable so that it can
/// itself be an element of sorted and hashed containers: floats compare by
/// [`f64::total_cmp`], and unordered containers compare by their sorted
/// entries.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    /// A host-default sequence.
    Seq(Vec<Value>),
    /// A host-default map, in input order.
    Map(Vec<(Value, Value)>),
    /// A polymorphic value and its type id.
    Tagged(String, Box<Value>),
    Optional(Option<Box<Value>>),
    Range(Box<Range<Value>>),
    HostAndPort(HostAndPort),
    Collection(Box<Collection>),
}

impl Value {
    const fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::UInt(_) => 3,
            Value::Float(_) => 4,
            Value::String(_) => 5,
            Value::Seq(_) => 6,
            Value::Map(_) => 7,
            Value::Tagged(..) => 8,
            Value::Optional(_) => 9,
            Value::Range(_) => 10,
            Value::HostAndPort(_) => 11,
            Value::Collection(_) => 12,
        }
    }

    /// Name of the variant, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Seq(_) => "sequence",
            Value::Map(_) => "map",
            Value::Tagged(..) => "tagged",
            Value::Optional(_) => "optional",
            Value::Range(_) => "range",
            Value::HostAndPort(_) => "host and port",
            Value::Collection(_) => "collection",
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(v) => Some(v),
            Value::UInt(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    #[inline]
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Value::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// `Some(inner)` for optional values, where `inner` is `None` when absent.
    #[inline]
    pub fn as_optional(&self) -> Option<Option<&Value>> {
        match self {
            Value::Optional(inner) => Some(inner.as_deref()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_range(&self) -> Option<&Range<Value>> {
        match self {
            Value::Range(r) => Some(r),
            _ => None,
        }
    }

    #[inline]
    pub fn as_host_and_port(&self) -> Option<&HostAndPort> {
        match self {
            Value::HostAndPort(h) => Some(h),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => fmt::Display::fmt(v, f),
            Value::Int(v) => fmt::Display::fmt(v, f),
            Value::UInt(v) => fmt::Display::fmt(v, f),
            Value::Float(v) => fmt::Display::fmt(v, f),
            Value::String(v) => fmt::Debug::fmt(v, f),
            Value::Range(v) => fmt::Display::fmt(v, f),
            Value::HostAndPort(v) => fmt::Display::fmt(v, f),
            _ => fmt::Debug::fmt(self, f),
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Collection> for Value {
    #[inline]
    fn from(value: Collection) -> Self {
        Value::Collection(Box::new(value))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::UInt(a), Value::UInt(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Seq(a), Value::Seq(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => a.cmp(b),
            (Value::Tagged(ta, a), Value::Tagged(tb, b)) => ta.cmp(tb).then_with(|| a.cmp(b)),
            (Value::Optional(a), Value::Optional(b)) => a.cmp(b),
            (Value::Range(a), Value::Range(b)) => a.cmp(b),
            (Value::HostAndPort(a), Value::HostAndPort(b)) => a.cmp(b),
            (Value::Collection(a), Value::Collection(b)) => a.canonical_cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::UInt(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::String(v) => v.hash(state),
            Value::Seq(v) => v.hash(state),
            Value::Map(v) => v.hash(state),
            Value::Tagged(t, v) => {
                t.hash(state);
                v.hash(state);
            }
            Value::Optional(v) => v.hash(state),
            Value::Range(v) => v.hash(state),
            Value::HostAndPort(v) => v.hash(state),
            Value::Collection(c) => {
                c.rank().hash(state);
                c.len().hash(state);
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Collection

/// A container built by one of the strategies.
#[derive(Debug, Clone)]
pub enum Collection {
    List(ImmutableList<Value>),
    Set(ImmutableSet<Value>),
    SortedSet(ImmutableSortedSet<Value>),
    ImmutableMultiset(ImmutableMultiset<Value>),
    HashMultiset(HashMultiset<Value>),
    LinkedHashMultiset(LinkedHashMultiset<Value>),
    TreeMultiset(TreeMultiset<Value>),
    Map(ImmutableMap<Value, Value>),
    SortedMap(ImmutableSortedMap<Value, Value>),
    BiMap(ImmutableBiMap<Value, Value>),
    ArrayListMultimap(ArrayListMultimap<Value, Value>),
    LinkedListMultimap(LinkedListMultimap<Value, Value>),
    HashMultimap(HashMultimap<Value, Value>),
    LinkedHashMultimap(LinkedHashMultimap<Value, Value>),
}

type Entry<'a> = (&'a Value, Option<&'a Value>);

impl Collection {
    const fn rank(&self) -> u8 {
        match self {
            Collection::List(_) => 0,
            Collection::Set(_) => 1,
            Collection::SortedSet(_) => 2,
            Collection::ImmutableMultiset(_) => 3,
            Collection::HashMultiset(_) => 4,
            Collection::LinkedHashMultiset(_) => 5,
            Collection::TreeMultiset(_) => 6,
            Collection::Map(_) => 7,
            Collection::SortedMap(_) => 8,
            Collection::BiMap(_) => 9,
            Collection::ArrayListMultimap(_) => 10,
            Collection::LinkedListMultimap(_) => 11,
            Collection::HashMultimap(_) => 12,
            Collection::LinkedHashMultimap(_) => 13,
        }
    }

    /// The family this container belongs to.
    pub const fn family(&self) -> Family {
        match self {
            Collection::List(_) => Family::ImmutableSequence,
            Collection::Set(_) => Family::ImmutableSet,
            Collection::SortedSet(_) => Family::ImmutableOrderedSet,
            Collection::ImmutableMultiset(_) => Family::ImmutableMultiset,
            Collection::HashMultiset(_) => Family::Multiset(MultisetKind::Hashed),
            Collection::LinkedHashMultiset(_) => Family::Multiset(MultisetKind::InsertionOrdered),
            Collection::TreeMultiset(_) => Family::Multiset(MultisetKind::Sorted),
            Collection::Map(_) => Family::ImmutableMap(ImmutableMapKind::Plain),
            Collection::SortedMap(_) => Family::ImmutableMap(ImmutableMapKind::Sorted),
            Collection::BiMap(_) => Family::ImmutableMap(ImmutableMapKind::Bidirectional),
            Collection::ArrayListMultimap(_) => Family::ListMultimap(ListMultimapKind::ArrayBacked),
            Collection::LinkedListMultimap(_) => Family::ListMultimap(ListMultimapKind::Linked),
            Collection::HashMultimap(_) => Family::SetMultimap(SetMultimapKind::Hashed),
            Collection::LinkedHashMultimap(_) => Family::SetMultimap(SetMultimapKind::LinkedHashed),
        }
    }

    /// Number of elements or entries, duplicates included.
    pub fn len(&self) -> usize {
        use vc_collections::{Multimap, Multiset};
        match self {
            Collection::List(c) => c.len(),
            Collection::Set(c) => c.len(),
            Collection::SortedSet(c) => c.len(),
            Collection::ImmutableMultiset(c) => c.len(),
            Collection::HashMultiset(c) => c.len(),
            Collection::LinkedHashMultiset(c) => c.len(),
            Collection::TreeMultiset(c) => c.len(),
            Collection::Map(c) => c.len(),
            Collection::SortedMap(c) => c.len(),
            Collection::BiMap(c) => c.len(),
            Collection::ArrayListMultimap(c) => c.len(),
            Collection::LinkedListMultimap(c) => c.len(),
            Collection::HashMultimap(c) => c.len(),
            Collection::LinkedHashMultimap(c) => c.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every element (or key with its value), and whether order is significant.
    fn entries(&self) -> (bool, Vec<Entry<'_>>) {
        fn single<'a>(iter: impl Iterator<Item = &'a Value>) -> Vec<Entry<'a>> {
            iter.map(|v| (v, None)).collect()
        }
        fn paired<'a>(iter: impl Iterator<Item = (&'a Value, &'a Value)>) -> Vec<Entry<'a>> {
            iter.map(|(k, v)| (k, Some(v))).collect()
        }

        match self {
            Collection::List(c) => (true, single(c.iter())),
            Collection::Set(c) => (false, single(c.iter())),
            Collection::SortedSet(c) => (true, single(c.iter())),
            Collection::ImmutableMultiset(c) => (false, single(c.iter())),
            Collection::HashMultiset(c) => (false, single(c.iter())),
            Collection::LinkedHashMultiset(c) => (false, single(c.iter())),
            Collection::TreeMultiset(c) => (true, single(c.iter())),
            Collection::Map(c) => (false, paired(c.iter())),
            Collection::SortedMap(c) => (true, paired(c.iter())),
            Collection::BiMap(c) => (false, paired(c.iter())),
            Collection::ArrayListMultimap(c) => (false, paired(c.iter())),
            Collection::LinkedListMultimap(c) => (false, paired(c.iter())),
            Collection::HashMultimap(c) => (false, paired(c.iter())),
            Collection::LinkedHashMultimap(c) => (false, paired(c.iter())),
        }
    }

    fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank()).then_with(|| {
            let (ordered, mut a) = self.entries();
            let (_, mut b) = other.entries();
            if !ordered {
                a.sort_unstable();
                b.sort_unstable();
            }
            a.cmp(&b)
        })
    }

    #[inline]
    pub fn as_list(&self) -> Option<&ImmutableList<Value>> {
        match self {
            Collection::List(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub fn as_set(&self) -> Option<&ImmutableSet<Value>> {
        match self {
            Collection::Set(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub fn as_sorted_set(&self) -> Option<&ImmutableSortedSet<Value>> {
        match self {
            Collection::SortedSet(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&ImmutableMap<Value, Value>> {
        match self {
            Collection::Map(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bimap(&self) -> Option<&ImmutableBiMap<Value, Value>> {
        match self {
            Collection::BiMap(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub fn as_hash_multimap(&self) -> Option<&HashMultimap<Value, Value>> {
        match self {
            Collection::HashMultimap(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub fn as_linked_list_multimap(&self) -> Option<&LinkedListMultimap<Value, Value>> {
        match self {
            Collection::LinkedListMultimap(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Collection, Value};
    use alloc::boxed::Box;
    use alloc::vec;
    use vc_collections::{HashMultiset, ImmutableList, ImmutableSet, ImmutableSortedSet};

    #[test]
    fn float_identity_uses_bits() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
        assert!(Value::Float(-1.5) < Value::Float(2.0));
    }

    #[test]
    fn kinds_are_ranked() {
        use Value::{Bool, Int, Null};

        let mut values = vec![Value::from("a"), Int(1), Null, Bool(true)];
        values.sort();
        assert_eq!(values, [Null, Bool(true), Int(1), Value::from("a")]);
    }

    #[test]
    fn unordered_collections_compare_by_contents() {
        let a: ImmutableSet<Value> = [Value::Int(1), Value::Int(2)].into_iter().collect();
        let b: ImmutableSet<Value> = [Value::Int(2), Value::Int(1)].into_iter().collect();
        assert_eq!(
            Value::from(Collection::Set(a)),
            Value::from(Collection::Set(b))
        );

        let a: ImmutableList<Value> = [Value::Int(1), Value::Int(2)].into_iter().collect();
        let b: ImmutableList<Value> = [Value::Int(2), Value::Int(1)].into_iter().collect();
        assert_ne!(
            Value::from(Collection::List(a)),
            Value::from(Collection::List(b))
        );
    }

    #[test]
    fn collections_nest_inside_hashed_containers() {
        let inner: ImmutableSortedSet<Value> = [Value::Int(3)].into_iter().collect();
        let element = Value::from(Collection::SortedSet(inner));
        let bag: HashMultiset<Value> = [element.clone(), element.clone()].into_iter().collect();
        assert_eq!(vc_collections::Multiset::count(&bag, &element), 2);
    }

    #[test]
    fn optional_accessor() {
        let present = Value::Optional(Some(Box::new(Value::Int(4))));
        assert_eq!(present.as_optional(), Some(Some(&Value::Int(4))));
        assert_eq!(Value::Optional(None).as_optional(), Some(None));
        assert_eq!(Value::Null.as_optional(), None);
    }
}
