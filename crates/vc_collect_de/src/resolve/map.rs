use alloc::sync::Arc;

use super::{Resolution, resolved, unimplemented_family};
use crate::de::{TypeDiscriminator, ValueDeserializer};
use crate::family::{Family, ImmutableMapKind};
use crate::info::TypeDescriptor;
use crate::strategy::{MapStrategy, MapTarget, Strategy};
use crate::taxonomy;
use crate::{DeserializeConfig, ResolveError};

/// Resolves immutable maps: plain, sorted and bidirectional.
///
/// Mutable bidirectional maps have no strategy, and plain mutable maps are
/// always left to the host.
pub fn resolve_map(
    descriptor: &TypeDescriptor,
    config: &DeserializeConfig,
    key: Arc<dyn ValueDeserializer>,
    discriminator: Option<Arc<dyn TypeDiscriminator>>,
    value: Arc<dyn ValueDeserializer>,
) -> Result<Resolution, ResolveError> {
    let Some(family) = taxonomy::classify_map(descriptor.raw_class()) else {
        return Ok(Resolution::NotHandled);
    };

    let target = match family {
        Family::ImmutableMap(ImmutableMapKind::Plain) => MapTarget::Map,
        Family::ImmutableMap(ImmutableMapKind::Sorted) => MapTarget::SortedMap,
        Family::ImmutableMap(ImmutableMapKind::Bidirectional) => MapTarget::BiMap,
        Family::BidirectionalMap(_) => return Ok(unimplemented_family(descriptor, family)),
        Family::Map
        | Family::ImmutableSequence
        | Family::ImmutableOrderedSet
        | Family::ImmutableSet
        | Family::ImmutableMultiset
        | Family::Multiset(_)
        | Family::ListMultimap(_)
        | Family::SetMultimap(_)
        | Family::Table
        | Family::ScalarWrapper(_) => return Ok(Resolution::NotHandled),
    };

    let strategy = MapStrategy::new(
        descriptor.clone(),
        target,
        key,
        value,
        discriminator,
        config.features(),
    );
    Ok(resolved(descriptor, Strategy::owned(strategy)))
}

#[cfg(test)]
mod tests {
    use super::resolve_map;
    use crate::DeserializeConfig;
    use crate::de::{IntDeserializer, StringDeserializer};
    use crate::family::{Family, ImmutableMapKind};
    use crate::info::{RawClass, TypeDescriptor, classes};
    use alloc::sync::Arc;

    fn resolve(raw: &'static RawClass) -> Option<Family> {
        let descriptor = TypeDescriptor::map(
            raw,
            TypeDescriptor::of(&classes::STRING),
            TypeDescriptor::of(&classes::I64),
        );
        resolve_map(
            &descriptor,
            &DeserializeConfig::new(),
            Arc::new(StringDeserializer),
            None,
            Arc::new(IntDeserializer),
        )
        .unwrap()
        .into_strategy()
        .map(|strategy| strategy.family())
    }

    #[test]
    fn immutable_maps() {
        assert_eq!(
            resolve(&classes::IMMUTABLE_MAP),
            Some(Family::ImmutableMap(ImmutableMapKind::Plain))
        );
        assert_eq!(
            resolve(&classes::IMMUTABLE_SORTED_MAP),
            Some(Family::ImmutableMap(ImmutableMapKind::Sorted))
        );
        assert_eq!(
            resolve(&classes::IMMUTABLE_BI_MAP),
            Some(Family::ImmutableMap(ImmutableMapKind::Bidirectional))
        );
    }

    #[test]
    fn mutable_maps_are_not_handled() {
        static REGISTRY: RawClass = RawClass::new("app::Registry", &[&classes::BI_MAP]);
        for raw in [
            &classes::HASH_BI_MAP,
            &classes::ENUM_BI_MAP,
            &classes::ENUM_HASH_BI_MAP,
            &REGISTRY,
            &classes::HASH_MAP,
            &classes::BTREE_MAP,
        ] {
            assert_eq!(resolve(raw), None, "{raw:?}");
        }
    }
}
