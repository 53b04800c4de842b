use alloc::sync::Arc;
use core::fmt;

use serde_core::Deserializer;
use serde_core::de::{MapAccess, Visitor};
use vc_collections::Multimap;

use super::{Children, ContainerStrategy, ElementsSeed};
use crate::de::{DeserializeDriver, TypeDiscriminator, ValueDeserializer};
use crate::family::{Family, ListMultimapKind, SetMultimapKind};
use crate::info::TypeDescriptor;
use crate::{Collection, DeserializeFeatures, Value};

/// The multimap a [`MultimapStrategy`] accumulates into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultimapTarget {
    ArrayList,
    LinkedList,
    Hash,
    LinkedHash,
}

impl MultimapTarget {
    pub const fn family(self) -> Family {
        match self {
            MultimapTarget::ArrayList => Family::ListMultimap(ListMultimapKind::ArrayBacked),
            MultimapTarget::LinkedList => Family::ListMultimap(ListMultimapKind::Linked),
            MultimapTarget::Hash => Family::SetMultimap(SetMultimapKind::Hashed),
            MultimapTarget::LinkedHash => Family::SetMultimap(SetMultimapKind::LinkedHashed),
        }
    }
}

fn read_buckets<'de, M, A>(
    mut map: A,
    key: DeserializeDriver<'_>,
    bucket: ElementsSeed<'_>,
) -> Result<M, A::Error>
where
    M: Multimap<Value, Value> + Default,
    A: MapAccess<'de>,
{
    let mut multimap = M::default();
    while let Some((entry_key, values)) = map.next_entry_seed(key, bucket)? {
        multimap.put_all(entry_key, values);
    }
    Ok(multimap)
}

// -----------------------------------------------------------------------------
// MultimapStrategy

/// Accumulates an object of arrays into a multimap.
///
/// Each entry's array is the bucket for its key; repeated keys merge.
/// Set-bucket targets drop duplicate values within a bucket.
#[derive(Debug)]
pub struct MultimapStrategy {
    descriptor: TypeDescriptor,
    target: MultimapTarget,
    key: Arc<dyn ValueDeserializer>,
    value: Arc<dyn ValueDeserializer>,
    discriminator: Option<Arc<dyn TypeDiscriminator>>,
    features: DeserializeFeatures,
}

impl MultimapStrategy {
    pub fn new(
        descriptor: TypeDescriptor,
        target: MultimapTarget,
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
    pub fn target(&self) -> MultimapTarget {
        self.target
    }
}

struct BucketsVisitor<'a> {
    strategy: &'a MultimapStrategy,
}

impl<'de> Visitor<'de> for BucketsVisitor<'_> {
    type Value = Collection;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "an object of arrays for `{}`",
            self.strategy.descriptor
        )
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        let strategy = self.strategy;
        let key = DeserializeDriver::new(&*strategy.key);
        let bucket = ElementsSeed {
            element: DeserializeDriver::with_discriminator(
                &*strategy.value,
                strategy.discriminator.as_deref(),
            ),
            single_value: strategy
                .features
                .contains(DeserializeFeatures::ACCEPT_SINGLE_VALUE_AS_ARRAY),
            descriptor: &strategy.descriptor,
        };

        Ok(match strategy.target {
            MultimapTarget::ArrayList => {
                Collection::ArrayListMultimap(read_buckets(map, key, bucket)?)
            }
            MultimapTarget::LinkedList => {
                Collection::LinkedListMultimap(read_buckets(map, key, bucket)?)
            }
            MultimapTarget::Hash => Collection::HashMultimap(read_buckets(map, key, bucket)?),
            MultimapTarget::LinkedHash => {
                Collection::LinkedHashMultimap(read_buckets(map, key, bucket)?)
            }
        })
    }
}

impl ValueDeserializer for MultimapStrategy {
    fn deserialize<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        let multimap = deserializer.deserialize_map(BucketsVisitor { strategy: self })?;
        Ok(Value::from(multimap))
    }
}

impl ContainerStrategy for MultimapStrategy {
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
