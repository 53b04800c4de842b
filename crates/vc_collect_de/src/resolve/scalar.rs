use super::{Resolution, resolved};
use crate::family::{Family, WrapperKind};
use crate::info::TypeDescriptor;
use crate::strategy::{HOST_AND_PORT, OptionalStrategy, RangeStrategy, Strategy};
use crate::taxonomy;
use crate::{DeserializeConfig, ResolveError};

/// Resolves the single-value wrappers, matching the exact class only.
///
/// An `Optional` without a type parameter wraps `unknown` and reads its
/// contents untyped. Its discriminator is the one attached to the wrapped
/// type, then the one attached to the `Optional` itself, then the registered
/// one for the wrapped class. `HostAndPort` always resolves to the shared
/// [`HOST_AND_PORT`] strategy.
pub fn resolve_scalar(
    descriptor: &TypeDescriptor,
    config: &DeserializeConfig,
) -> Result<Resolution, ResolveError> {
    let Some(family) = taxonomy::classify_scalar(descriptor.raw_class()) else {
        return Ok(Resolution::NotHandled);
    };

    let strategy = match family {
        Family::ScalarWrapper(WrapperKind::Optional) => {
            let reference = descriptor
                .type_param(0)
                .cloned()
                .unwrap_or_else(TypeDescriptor::unknown);
            let value = reference
                .value_handler()
                .cloned()
                .or_else(|| config.find_scalar(&reference))
                .unwrap_or_else(|| config.untyped());
            let discriminator = reference
                .type_handler()
                .or_else(|| descriptor.type_handler())
                .cloned()
                .or_else(|| config.find_discriminator(&reference));
            Strategy::owned(OptionalStrategy::new(
                descriptor.clone(),
                reference,
                value,
                discriminator,
            ))
        }
        Family::ScalarWrapper(WrapperKind::Range) => {
            Strategy::owned(RangeStrategy::new(descriptor.clone()))
        }
        Family::ScalarWrapper(WrapperKind::HostAndPort) => Strategy::Shared(&HOST_AND_PORT),
        Family::ImmutableSequence
        | Family::ImmutableOrderedSet
        | Family::ImmutableSet
        | Family::ImmutableMultiset
        | Family::Multiset(_)
        | Family::Map
        | Family::ImmutableMap(_)
        | Family::BidirectionalMap(_)
        | Family::ListMultimap(_)
        | Family::SetMultimap(_)
        | Family::Table => return Ok(Resolution::NotHandled),
    };
    Ok(resolved(descriptor, strategy))
}

#[cfg(test)]
mod tests {
    use super::resolve_scalar;
    use crate::de::{
        DeserializeDriver, IntDeserializer, StringDeserializer, WrapperObjectDiscriminator,
    };
    use crate::info::{RawClass, TypeDescriptor, classes};
    use crate::strategy::{
        ContainerStrategy, HOST_AND_PORT, HostAndPortStrategy, OptionalStrategy, Strategy,
    };
    use crate::{DeserializeConfig, Value};
    use alloc::boxed::Box;
    use alloc::string::ToString;
    use alloc::sync::Arc;
    use alloc::vec;
    use serde_core::de::DeserializeSeed;

    fn resolve(descriptor: &TypeDescriptor) -> Option<Strategy> {
        resolve_scalar(descriptor, &DeserializeConfig::new())
            .unwrap()
            .into_strategy()
    }

    #[test]
    fn optional_of_string() {
        let ty = TypeDescriptor::with_params(
            &classes::OPTIONAL,
            vec![TypeDescriptor::of(&classes::STRING)],
        );
        let strategy = resolve(&ty).unwrap();

        let read = |text: &str| {
            let mut input = serde_json::Deserializer::from_str(text);
            DeserializeDriver::new(&strategy)
                .deserialize(&mut input)
                .unwrap()
        };
        assert_eq!(read("null"), Value::Optional(None));
        assert_eq!(read(r#""x""#).as_optional(), Some(Some(&Value::from("x"))));

        let mut input = serde_json::Deserializer::from_str("1");
        let number = DeserializeDriver::new(&strategy).deserialize(&mut input);
        assert!(number.is_err());
    }

    #[test]
    fn bare_optional_wraps_unknown() {
        let strategy = resolve(&TypeDescriptor::of(&classes::OPTIONAL)).unwrap();
        assert!(!strategy.is_shared());

        let mut input = serde_json::Deserializer::from_str("[1, true]");
        let value = DeserializeDriver::new(&strategy)
            .deserialize(&mut input)
            .unwrap();
        let Some(Some(Value::Seq(items))) = value.as_optional() else {
            panic!("expected a present sequence, got {value:?}");
        };
        assert_eq!(items.len(), 2);

        let direct = OptionalStrategy::new(
            TypeDescriptor::of(&classes::OPTIONAL),
            TypeDescriptor::unknown(),
            DeserializeConfig::new().untyped(),
            None,
        );
        assert_eq!(direct.reference_type().raw_class(), &classes::UNKNOWN);
    }

    #[test]
    fn optional_uses_its_own_type_handler() {
        let ids = WrapperObjectDiscriminator::new(&classes::UNKNOWN)
            .with_subtype("Id", Arc::new(IntDeserializer));
        let ty = TypeDescriptor::with_params(&classes::OPTIONAL, vec![TypeDescriptor::unknown()])
            .with_type_handler(Arc::new(ids));
        let strategy = resolve(&ty).unwrap();

        let mut input = serde_json::Deserializer::from_str(r#"{"Id": 4}"#);
        let value = DeserializeDriver::new(&strategy)
            .deserialize(&mut input)
            .unwrap();
        assert_eq!(
            value,
            Value::Optional(Some(Box::new(Value::Tagged("Id".into(), Box::new(Value::Int(4))))))
        );
    }

    #[test]
    fn wrapped_type_handler_wins() {
        let names = WrapperObjectDiscriminator::new(&classes::UNKNOWN)
            .with_subtype("Name", Arc::new(StringDeserializer));
        let ids = WrapperObjectDiscriminator::new(&classes::UNKNOWN)
            .with_subtype("Id", Arc::new(IntDeserializer));
        let reference = TypeDescriptor::unknown().with_type_handler(Arc::new(names));
        let ty = TypeDescriptor::with_params(&classes::OPTIONAL, vec![reference])
            .with_type_handler(Arc::new(ids));
        let strategy = resolve(&ty).unwrap();

        let mut input = serde_json::Deserializer::from_str(r#"{"Name": "x"}"#);
        let value = DeserializeDriver::new(&strategy)
            .deserialize(&mut input)
            .unwrap();
        let Some(Some(Value::Tagged(id, _))) = value.as_optional() else {
            panic!("expected a present tagged value, got {value:?}");
        };
        assert_eq!(id, "Name");
    }

    #[test]
    fn host_and_port_is_shared() {
        let strategy = resolve(&TypeDescriptor::of(&classes::HOST_AND_PORT)).unwrap();
        let Strategy::Shared(shared) = strategy else {
            panic!("host and port should resolve to the shared strategy");
        };
        assert!(core::ptr::eq(
            (shared as *const dyn ContainerStrategy).cast::<u8>(),
            (&HOST_AND_PORT as *const HostAndPortStrategy).cast::<u8>(),
        ));

        let again = resolve(&TypeDescriptor::of(&classes::HOST_AND_PORT)).unwrap();
        assert!(again.is_shared());
    }

    #[test]
    fn exact_class_only() {
        static WINDOW: RawClass = RawClass::new("app::Window", &[&classes::RANGE]);
        assert!(resolve(&TypeDescriptor::of(&WINDOW)).is_none());
        assert!(resolve(&TypeDescriptor::of(&classes::STRING)).is_none());

        let range = resolve(&TypeDescriptor::of(&classes::RANGE)).unwrap();
        let mut input = serde_json::Deserializer::from_str(
            r#"{"lowerEndpoint": 1, "lowerBoundType": "CLOSED"}"#,
        );
        let value = DeserializeDriver::new(&range)
            .deserialize(&mut input)
            .unwrap();
        assert_eq!(value.to_string(), "[1..+\u{221e})");
    }
}
