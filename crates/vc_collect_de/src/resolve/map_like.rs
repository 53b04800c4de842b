use alloc::sync::Arc;

use super::{Resolution, resolved, unimplemented_family};
use crate::de::{TypeDiscriminator, ValueDeserializer};
use crate::family::{Family, ListMultimapKind, SetMultimapKind};
use crate::info::TypeDescriptor;
use crate::strategy::{MultimapStrategy, MultimapTarget, Strategy};
use crate::taxonomy;
use crate::{DeserializeConfig, ResolveError};

/// Resolves multimaps with list or set buckets.
///
/// A multimap that is neither list- nor set-bucketed gets a linked list
/// multimap, with a warning. Tables have no strategy.
pub fn resolve_map_like(
    descriptor: &TypeDescriptor,
    config: &DeserializeConfig,
    key: Arc<dyn ValueDeserializer>,
    discriminator: Option<Arc<dyn TypeDiscriminator>>,
    value: Arc<dyn ValueDeserializer>,
) -> Result<Resolution, ResolveError> {
    let raw = descriptor.raw_class();
    let Some(family) = taxonomy::classify_map_like(raw) else {
        return Ok(Resolution::NotHandled);
    };

    let target = match family {
        Family::ListMultimap(ListMultimapKind::ArrayBacked) => MultimapTarget::ArrayList,
        Family::ListMultimap(ListMultimapKind::Linked) => {
            if taxonomy::is_generic_multimap(raw) {
                log::warn!(
                    "`{descriptor}` is neither a list nor a set multimap; reading it as a linked list multimap"
                );
            }
            MultimapTarget::LinkedList
        }
        Family::SetMultimap(SetMultimapKind::Hashed) => MultimapTarget::Hash,
        Family::SetMultimap(SetMultimapKind::LinkedHashed) => MultimapTarget::LinkedHash,
        Family::ListMultimap(ListMultimapKind::Immutable | ListMultimapKind::Forwarding)
        | Family::SetMultimap(
            SetMultimapKind::Tree
            | SetMultimapKind::ForwardingSorted
            | SetMultimapKind::Immutable
            | SetMultimapKind::Forwarding,
        )
        | Family::Table => return Ok(unimplemented_family(descriptor, family)),
        Family::ImmutableSequence
        | Family::ImmutableOrderedSet
        | Family::ImmutableSet
        | Family::ImmutableMultiset
        | Family::Multiset(_)
        | Family::Map
        | Family::ImmutableMap(_)
        | Family::BidirectionalMap(_)
        | Family::ScalarWrapper(_) => return Ok(Resolution::NotHandled),
    };

    let strategy = MultimapStrategy::new(
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
    use super::resolve_map_like;
    use crate::de::{DeserializeDriver, IntDeserializer, StringDeserializer};
    use crate::family::{Family, ListMultimapKind, SetMultimapKind};
    use crate::info::{RawClass, TypeDescriptor, classes};
    use crate::{Collection, DeserializeConfig, Value};
    use alloc::sync::Arc;
    use serde_core::de::DeserializeSeed;

    fn descriptor(raw: &'static RawClass) -> TypeDescriptor {
        TypeDescriptor::map(
            raw,
            TypeDescriptor::of(&classes::STRING),
            TypeDescriptor::of(&classes::I64),
        )
    }

    fn resolve(raw: &'static RawClass) -> Option<Family> {
        resolve_map_like(
            &descriptor(raw),
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
    fn implemented_multimaps() {
        use Family as F;
        use ListMultimapKind as L;
        use SetMultimapKind as S;

        let cases = [
            (
                &classes::ARRAY_LIST_MULTIMAP,
                F::ListMultimap(L::ArrayBacked),
            ),
            (&classes::LINKED_LIST_MULTIMAP, F::ListMultimap(L::Linked)),
            (&classes::HASH_MULTIMAP, F::SetMultimap(S::Hashed)),
            (
                &classes::LINKED_HASH_MULTIMAP,
                F::SetMultimap(S::LinkedHashed),
            ),
        ];
        for (raw, family) in cases {
            assert_eq!(resolve(raw), Some(family), "{raw:?}");
        }
    }

    #[test]
    fn defaults() {
        static SCORES: RawClass = RawClass::new("app::Scores", &[&classes::SORTED_SET_MULTIMAP]);
        static INDEX: RawClass = RawClass::new("app::Index", &[&classes::MULTIMAP]);

        assert_eq!(
            resolve(&classes::LIST_MULTIMAP),
            Some(Family::ListMultimap(ListMultimapKind::ArrayBacked))
        );
        assert_eq!(
            resolve(&classes::SET_MULTIMAP),
            Some(Family::SetMultimap(SetMultimapKind::Hashed))
        );
        assert_eq!(
            resolve(&SCORES),
            Some(Family::SetMultimap(SetMultimapKind::Hashed))
        );
        assert_eq!(
            resolve(&INDEX),
            Some(Family::ListMultimap(ListMultimapKind::Linked))
        );
    }

    #[test]
    fn gaps() {
        for raw in [
            &classes::IMMUTABLE_LIST_MULTIMAP,
            &classes::FORWARDING_LIST_MULTIMAP,
            &classes::TREE_MULTIMAP,
            &classes::FORWARDING_SORTED_SET_MULTIMAP,
            &classes::IMMUTABLE_SET_MULTIMAP,
            &classes::FORWARDING_SET_MULTIMAP,
            &classes::TABLE,
            &classes::HASH_MAP,
        ] {
            assert_eq!(resolve(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn hash_multimap_end_to_end() {
        let strategy = resolve_map_like(
            &descriptor(&classes::HASH_MULTIMAP),
            &DeserializeConfig::new(),
            Arc::new(StringDeserializer),
            None,
            Arc::new(IntDeserializer),
        )
        .unwrap()
        .into_strategy()
        .unwrap();

        let mut input = serde_json::Deserializer::from_str(r#"{"a": [1, 1, 2]}"#);
        let value = DeserializeDriver::new(&strategy)
            .deserialize(&mut input)
            .unwrap();
        let map = value
            .as_collection()
            .and_then(Collection::as_hash_multimap)
            .unwrap();
        let bucket = map.get(&Value::from("a")).unwrap();
        assert_eq!(bucket.len(), 2);
        assert!(bucket.contains(&Value::Int(1)));
        assert!(bucket.contains(&Value::Int(2)));
    }
}
