use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use serde_core::Deserializer;
use serde_core::de::{Error, MapAccess, Visitor};
use vc_collections::{ImmutableBiMap, ImmutableMap, ImmutableSortedMap};

use super::{Children, ContainerStrategy, reject_nulls};
use crate::de::{DeserializeDriver, TypeDiscriminator, ValueDeserializer};
use crate::family::{Family, ImmutableMapKind};
use crate::info::TypeDescriptor;
use crate::{Collection, DeserializeFeatures, Value};

/// The map a [`MapStrategy`] accumulates into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapTarget {
    Map,
    SortedMap,
    BiMap,
}

impl MapTarget {
    pub const fn family(self) -> Family {
        let kind = match self {
            MapTarget::Map => ImmutableMapKind::Plain,
            MapTarget::SortedMap => ImmutableMapKind::Sorted,
            MapTarget::BiMap => ImmutableMapKind::Bidirectional,
        };
        Family::ImmutableMap(kind)
    }
}

// -----------------------------------------------------------------------------
// MapStrategy

/// Accumulates an object into an immutable map.
///
/// Duplicate keys fail, as do duplicate values for a bidirectional map.
#[derive(Debug)]
pub struct MapStrategy {
    descriptor: TypeDescriptor,
    target: MapTarget,
    key: Arc<dyn ValueDeserializer>,
    value: Arc<dyn ValueDeserializer>,
    discriminator: Option<Arc<dyn TypeDiscriminator>>,
    features: DeserializeFeatures,
}

impl MapStrategy {
    pub fn new(
        descriptor: TypeDescriptor,
        target: MapTarget,
        key: Arc<dyn ValueDeserializer>,
        value: Arc<dyn ValueDeserializer>,
        discriminator: Option<Arc<dyn TypeDiscriminator>>,
        features: DeserializeFeatures,
    ) -> Self {
        Self {
            descriptor,
            target,
            key,
            value,
            discriminator,
            features,
        }
    }

    #[inline]
    pub fn target(&self) -> MapTarget {
        self.target
    }
}

struct EntriesVisitor<'a> {
    strategy: &'a MapStrategy,
}

impl<'de> Visitor<'de> for EntriesVisitor<'_> {
    type Value = Vec<(Value, Value)>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "an object of entries for `{}`",
            self.strategy.descriptor
        )
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let strategy = self.strategy;
        let key = DeserializeDriver::new(&*strategy.key);
        let value = DeserializeDriver::with_discriminator(
            &*strategy.value,
            strategy.discriminator.as_deref(),
        );

        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or_default());
        while let Some(entry) = map.next_entry_seed(key, value)? {
            entries.push(entry);
        }
        Ok(entries)
    }
}

impl ValueDeserializer for MapStrategy {
    fn deserialize<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        let entries = deserializer.deserialize_map(EntriesVisitor { strategy: self })?;

        reject_nulls::<erased_serde::Error>(
            entries.iter().flat_map(|(k, v)| [k, v]),
            self.features
                .contains(DeserializeFeatures::ALLOW_NULL_ELEMENTS),
            &self.descriptor,
        )?;

        let collection = match self.target {
            MapTarget::Map => ImmutableMap::try_from_entries(entries).map(Collection::Map),
            MapTarget::SortedMap => {
                ImmutableSortedMap::try_from_entries(entries).map(Collection::SortedMap)
            }
            MapTarget::BiMap => ImmutableBiMap::try_from_entries(entries).map(Collection::BiMap),
        }
        .map_err(erased_serde::Error::custom)?;

        Ok(Value::from(collection))
    }
}

impl ContainerStrategy for MapStrategy {
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
            key: Some(Arc::clone(&self.key)),
            content: Some(Arc::clone(&self.value)),
            content_discriminator: self.discriminator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MapStrategy, MapTarget};
    use crate::de::{DeserializeDriver, IntDeserializer, StringDeserializer, UntypedDeserializer};
    use crate::info::{TypeDescriptor, classes};
    use crate::{Collection, DeserializeFeatures, Value};
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use serde_core::de::DeserializeSeed;

    fn strategy(target: MapTarget) -> MapStrategy {
        MapStrategy::new(
            TypeDescriptor::map(
                &classes::IMMUTABLE_MAP,
                TypeDescriptor::of(&classes::STRING),
                TypeDescriptor::of(&classes::I64),
            ),
            target,
            Arc::new(StringDeserializer),
            Arc::new(IntDeserializer),
            None,
            DeserializeFeatures::empty(),
        )
    }

    fn read(strategy: &MapStrategy, input: &str) -> Result<Value, serde_json::Error> {
        let mut input = serde_json::Deserializer::from_str(input);
        DeserializeDriver::new(strategy).deserialize(&mut input)
    }

    fn read_error(target: MapTarget, input: &str) -> String {
        read(&strategy(target), input).unwrap_err().to_string()
    }

    #[test]
    fn plain_map_keeps_input_order() {
        let value = read(&strategy(MapTarget::Map), r#"{"b": 2, "a": 1}"#).unwrap();
        let map = value.as_collection().and_then(Collection::as_map).unwrap();
        let keys: Vec<_> = map.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(map.get(&Value::from("a")), Some(&Value::Int(1)));
    }

    #[test]
    fn sorted_map_orders_keys() {
        let value = read(&strategy(MapTarget::SortedMap), r#"{"b": 2, "a": 1}"#).unwrap();
        let Some(Collection::SortedMap(map)) = value.as_collection() else {
            panic!("expected a sorted map, got {value:?}");
        };
        let keys: Vec<_> = map.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn duplicates_fail() {
        let err = read_error(MapTarget::Map, r#"{"a": 1, "a": 2}"#);
        assert!(err.contains("duplicate key"), "{err}");

        let err = read_error(MapTarget::BiMap, r#"{"a": 1, "b": 1}"#);
        assert!(err.contains("duplicate value"), "{err}");

        let value = read(&strategy(MapTarget::BiMap), r#"{"a": 1, "b": 2}"#).unwrap();
        let bimap = value
            .as_collection()
            .and_then(Collection::as_bimap)
            .unwrap();
        assert_eq!(bimap.get_by_value(&Value::Int(2)), Some(&Value::from("b")));
    }

    #[test]
    fn null_values_are_rejected() {
        let strategy = MapStrategy::new(
            TypeDescriptor::map(
                &classes::IMMUTABLE_MAP,
                TypeDescriptor::of(&classes::STRING),
                TypeDescriptor::unknown(),
            ),
            MapTarget::Map,
            Arc::new(StringDeserializer),
            Arc::new(UntypedDeserializer),
            None,
            DeserializeFeatures::empty(),
        );
        let err = read(&strategy, r#"{"a": null}"#).unwrap_err().to_string();
        assert!(err.contains("null value"), "{err}");
    }

    #[test]
    fn integer_keys_from_json_strings() {
        let strategy = MapStrategy::new(
            TypeDescriptor::map(
                &classes::IMMUTABLE_SORTED_MAP,
                TypeDescriptor::of(&classes::I64),
                TypeDescriptor::of(&classes::STRING),
            ),
            MapTarget::SortedMap,
            Arc::new(IntDeserializer),
            Arc::new(StringDeserializer),
            None,
            DeserializeFeatures::empty(),
        );
        let value = read(&strategy, r#"{"10": "ten", "2": "two"}"#).unwrap();
        let Some(Collection::SortedMap(map)) = value.as_collection() else {
            panic!("expected a sorted map, got {value:?}");
        };
        let keys: Vec<_> = map.keys().filter_map(Value::as_i64).collect();
        assert_eq!(keys, [2, 10]);
    }
}
