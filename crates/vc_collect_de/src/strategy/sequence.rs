use alloc::sync::Arc;
use alloc::vec::Vec;

use serde_core::de::DeserializeSeed;
use vc_collections::{
    HashMultiset, ImmutableList, ImmutableMultiset, ImmutableSet, ImmutableSortedSet,
    LinkedHashMultiset, TreeMultiset,
};

use super::{Children, ContainerStrategy, ElementsSeed, reject_nulls};
use crate::de::{DeserializeDriver, TypeDiscriminator, ValueDeserializer};
use crate::family::{Family, MultisetKind};
use crate::info::TypeDescriptor;
use crate::{Collection, DeserializeFeatures, Value};

/// The container a [`SequenceStrategy`] accumulates into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceTarget {
    List,
    Set,
    SortedSet,
    ImmutableMultiset,
    HashMultiset,
    LinkedHashMultiset,
    TreeMultiset,
}

impl SequenceTarget {
    pub const fn family(self) -> Family {
        match self {
            SequenceTarget::List => Family::ImmutableSequence,
            SequenceTarget::Set => Family::ImmutableSet,
            SequenceTarget::SortedSet => Family::ImmutableOrderedSet,
            SequenceTarget::ImmutableMultiset => Family::ImmutableMultiset,
            SequenceTarget::HashMultiset => Family::Multiset(MultisetKind::Hashed),
            SequenceTarget::LinkedHashMultiset => Family::Multiset(MultisetKind::InsertionOrdered),
            SequenceTarget::TreeMultiset => Family::Multiset(MultisetKind::Sorted),
        }
    }

    /// `true` for the targets that cannot hold `null`.
    pub const fn is_immutable(self) -> bool {
        matches!(
            self,
            SequenceTarget::List
                | SequenceTarget::Set
                | SequenceTarget::SortedSet
                | SequenceTarget::ImmutableMultiset
        )
    }

    fn build(self, items: Vec<Value>) -> Collection {
        match self {
            SequenceTarget::List => Collection::List(ImmutableList::from(items)),
            SequenceTarget::Set => Collection::Set(items.into_iter().collect::<ImmutableSet<_>>()),
            SequenceTarget::SortedSet => {
                Collection::SortedSet(items.into_iter().collect::<ImmutableSortedSet<_>>())
            }
            SequenceTarget::ImmutableMultiset => {
                Collection::ImmutableMultiset(items.into_iter().collect::<ImmutableMultiset<_>>())
            }
            SequenceTarget::HashMultiset => {
                Collection::HashMultiset(items.into_iter().collect::<HashMultiset<_>>())
            }
            SequenceTarget::LinkedHashMultiset => {
                Collection::LinkedHashMultiset(items.into_iter().collect::<LinkedHashMultiset<_>>())
            }
            SequenceTarget::TreeMultiset => {
                Collection::TreeMultiset(items.into_iter().collect::<TreeMultiset<_>>())
            }
        }
    }
}

// -----------------------------------------------------------------------------
// SequenceStrategy

/// Accumulates a sequence of elements into a list, set or multiset.
#[derive(Debug)]
pub struct SequenceStrategy {
    descriptor: TypeDescriptor,
    target: SequenceTarget,
    element: Arc<dyn ValueDeserializer>,
    discriminator: Option<Arc<dyn TypeDiscriminator>>,
    features: DeserializeFeatures,
}

impl SequenceStrategy {
    pub fn new(
        descriptor: TypeDescriptor,
        target: SequenceTarget,
        element: Arc<dyn ValueDeserializer>,
        discriminator: Option<Arc<dyn TypeDiscriminator>>,
        features: DeserializeFeatures,
    ) -> Self {
        Self {
            descriptor,
            target,
            element,
            discriminator,
            features,
        }
    }

    #[inline]
    pub fn target(&self) -> SequenceTarget {
        self.target
    }
}

impl ValueDeserializer for SequenceStrategy {
    fn deserialize<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        let seed = ElementsSeed {
            element: DeserializeDriver::with_discriminator(
                &*self.element,
                self.discriminator.as_deref(),
            ),
            single_value: self
                .features
                .contains(DeserializeFeatures::ACCEPT_SINGLE_VALUE_AS_ARRAY),
            descriptor: &self.descriptor,
        };
        let items = seed.deserialize(deserializer)?;

        if self.target.is_immutable() {
            reject_nulls::<erased_serde::Error>(
                &items,
                self.features
                    .contains(DeserializeFeatures::ALLOW_NULL_ELEMENTS),
                &self.descriptor,
            )?;
        }
        log::trace!("read {} elements into `{}`", items.len(), self.descriptor);
        Ok(Value::from(self.target.build(items)))
    }
}

impl ContainerStrategy for SequenceStrategy {
    #[inline]
    fn family(&self) -> Family {
        self.target.family()
    }

    #[inline]
    fn descriptor(&self) -> Option<&TypeDescriptor> {
        Some(&self.descriptor)
    }

    fn children(&self) -> Children {
        Children {
            key: None,
            content: Some(Arc::clone(&self.element)),
            content_discriminator: self.discriminator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SequenceStrategy, SequenceTarget};
    use crate::de::{
        DeserializeDriver, IntDeserializer, StringDeserializer, UntypedDeserializer,
        WrapperObjectDiscriminator,
    };
    use crate::info::{TypeDescriptor, classes};
    use crate::{Collection, DeserializeFeatures, Value};
    use alloc::string::ToString;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use serde_core::de::DeserializeSeed;
    use vc_collections::Multiset;

    fn strategy(target: SequenceTarget, features: DeserializeFeatures) -> SequenceStrategy {
        SequenceStrategy::new(
            TypeDescriptor::collection(&classes::IMMUTABLE_LIST, TypeDescriptor::of(&classes::I64)),
            target,
            Arc::new(IntDeserializer),
            None,
            features,
        )
    }

    fn read(strategy: &SequenceStrategy, input: &str) -> Result<Value, serde_json::Error> {
        let mut input = serde_json::Deserializer::from_str(input);
        DeserializeDriver::new(strategy).deserialize(&mut input)
    }

    fn read_ron(strategy: &SequenceStrategy, input: &str) -> Result<Value, ron::Error> {
        let mut input = ron::Deserializer::from_str(input).unwrap();
        DeserializeDriver::new(strategy).deserialize(&mut input)
    }

    fn read_strict(target: SequenceTarget, input: &str) -> Value {
        read(&strategy(target, DeserializeFeatures::empty()), input).unwrap()
    }

    fn ints<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<i64> {
        values.into_iter().filter_map(Value::as_i64).collect()
    }

    #[test]
    fn list_keeps_order_and_duplicates() {
        let value = read_strict(SequenceTarget::List, "[3, 1, 2, 1]");
        let list = value.as_collection().and_then(Collection::as_list).unwrap();
        assert_eq!(ints(list.iter()), [3, 1, 2, 1]);
    }

    #[test]
    fn sorted_set_sorts_and_dedups() {
        let value = read_strict(SequenceTarget::SortedSet, "[3, 1, 2, 2]");
        let set = value
            .as_collection()
            .and_then(Collection::as_sorted_set)
            .unwrap();
        assert_eq!(ints(set.iter()), [1, 2, 3]);
    }

    #[test]
    fn multisets_count() {
        let value = read_strict(SequenceTarget::TreeMultiset, "[2, 1, 2]");
        let Some(Collection::TreeMultiset(bag)) = value.as_collection() else {
            panic!("expected a tree multiset, got {value:?}");
        };
        assert_eq!(bag.count(&Value::Int(2)), 2);
        assert_eq!(ints(bag.iter()), [1, 2, 2]);
    }

    #[test]
    fn immutable_targets_reject_null() {
        let set = SequenceStrategy::new(
            TypeDescriptor::collection(&classes::IMMUTABLE_SET, TypeDescriptor::unknown()),
            SequenceTarget::Set,
            Arc::new(UntypedDeserializer),
            None,
            DeserializeFeatures::empty(),
        );
        let err = read(&set, "[1, null]").unwrap_err().to_string();
        assert!(err.contains("null value in immutable"), "{err}");

        let mutable = SequenceStrategy::new(
            TypeDescriptor::collection(&classes::HASH_MULTISET, TypeDescriptor::unknown()),
            SequenceTarget::HashMultiset,
            Arc::new(UntypedDeserializer),
            None,
            DeserializeFeatures::empty(),
        );
        let value = read(&mutable, "[null, null]").unwrap();
        assert_eq!(value.as_collection().map(Collection::len), Some(2));

        let allowed = SequenceStrategy::new(
            TypeDescriptor::collection(&classes::IMMUTABLE_LIST, TypeDescriptor::unknown()),
            SequenceTarget::List,
            Arc::new(UntypedDeserializer),
            None,
            DeserializeFeatures::ALLOW_NULL_ELEMENTS,
        );
        assert!(read(&allowed, "[null]").is_ok());
    }

    #[test]
    fn single_value_as_array() {
        let strict = strategy(SequenceTarget::List, DeserializeFeatures::empty());
        assert!(read(&strict, "7").is_err());

        let lenient = strategy(
            SequenceTarget::List,
            DeserializeFeatures::ACCEPT_SINGLE_VALUE_AS_ARRAY,
        );
        let value = read(&lenient, "7").unwrap();
        let list = value.as_collection().and_then(Collection::as_list).unwrap();
        assert_eq!(list.as_slice(), [Value::Int(7)]);

        let value = read(&lenient, "[7, 8]").unwrap();
        assert_eq!(value.as_collection().map(Collection::len), Some(2));
    }

    #[test]
    fn elements_go_through_the_discriminator() {
        let discriminator = WrapperObjectDiscriminator::new(&classes::UNKNOWN)
            .with_subtype("Name", Arc::new(StringDeserializer))
            .with_subtype("Id", Arc::new(IntDeserializer));
        let strategy = SequenceStrategy::new(
            TypeDescriptor::collection(&classes::IMMUTABLE_LIST, TypeDescriptor::unknown()),
            SequenceTarget::List,
            Arc::new(UntypedDeserializer),
            Some(Arc::new(discriminator)),
            DeserializeFeatures::empty(),
        );

        let value = read(&strategy, r#"[{"Name": "a"}, {"Id": 4}]"#).unwrap();
        let list = value.as_collection().and_then(Collection::as_list).unwrap();
        assert_eq!(
            list.as_slice(),
            [
                Value::Tagged("Name".into(), Value::from("a").into()),
                Value::Tagged("Id".into(), Value::Int(4).into()),
            ]
        );
    }

    #[test]
    fn reads_ron_sequences() {
        let strategy = strategy(SequenceTarget::Set, DeserializeFeatures::empty());
        let value = read_ron(&strategy, "[5, 4, 5]").unwrap();
        let set = value.as_collection().and_then(Collection::as_set).unwrap();
        assert_eq!(ints(set.iter()), [5, 4]);
    }

    #[test]
    fn ron_options_as_single_values() {
        let lenient = strategy(
            SequenceTarget::List,
            DeserializeFeatures::ACCEPT_SINGLE_VALUE_AS_ARRAY,
        );
        let value = read_ron(&lenient, "Some(7)").unwrap();
        let list = value.as_collection().and_then(Collection::as_list).unwrap();
        assert_eq!(list.as_slice(), [Value::Int(7)]);

        let untyped = SequenceStrategy::new(
            TypeDescriptor::collection(&classes::HASH_MULTISET, TypeDescriptor::unknown()),
            SequenceTarget::HashMultiset,
            Arc::new(UntypedDeserializer),
            None,
            DeserializeFeatures::ACCEPT_SINGLE_VALUE_AS_ARRAY,
        );
        let value = read_ron(&untyped, "None").unwrap();
        let Some(Collection::HashMultiset(bag)) = value.as_collection() else {
            panic!("expected a hash multiset, got {value:?}");
        };
        assert_eq!(bag.count(&Value::Null), 1);

        let strict = strategy(SequenceTarget::List, DeserializeFeatures::empty());
        assert!(read_ron(&strict, "Some(7)").is_err());
    }
}
