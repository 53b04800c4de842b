use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use serde_core::Deserializer;
use serde_core::de::{DeserializeSeed, Error, Visitor};

use super::{Children, ContainerStrategy};
use crate::Value;
use crate::de::{DeserializeDriver, TypeDiscriminator, ValueDeserializer};
use crate::family::{Family, WrapperKind};
use crate::info::TypeDescriptor;

// -----------------------------------------------------------------------------
// OptionalStrategy

/// Reads an optional box: `null` is absent, anything else is present.
#[derive(Debug)]
pub struct OptionalStrategy {
    descriptor: TypeDescriptor,
    reference: TypeDescriptor,
    value: Arc<dyn ValueDeserializer>,
    discriminator: Option<Arc<dyn TypeDiscriminator>>,
}

impl OptionalStrategy {
    pub fn new(
        descriptor: TypeDescriptor,
        reference: TypeDescriptor,
        value: Arc<dyn ValueDeserializer>,
        discriminator: Option<Arc<dyn TypeDiscriminator>>,
    ) -> Self {
        Self {
            descriptor,
            reference,
            value,
            discriminator,
        }
    }

    /// The wrapped type.
    #[inline]
    pub fn reference_type(&self) -> &TypeDescriptor {
        &self.reference
    }
}

struct OptionalVisitor<'a> {
    strategy: &'a OptionalStrategy,
}

impl<'de> Visitor<'de> for OptionalVisitor<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an optional `{}`", self.strategy.reference)
    }

    fn visit_none<E: Error>(self) -> Result<Value, E> {
        Ok(Value::Optional(None))
    }

    fn visit_unit<E: Error>(self) -> Result<Value, E> {
        Ok(Value::Optional(None))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        let strategy = self.strategy;
        let driver = DeserializeDriver::with_discriminator(
            &*strategy.value,
            strategy.discriminator.as_deref(),
        );
        let value = driver.deserialize(deserializer)?;
        Ok(Value::Optional(Some(Box::new(value))))
    }
}

impl ValueDeserializer for OptionalStrategy {
    fn deserialize<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        deserializer.deserialize_option(OptionalVisitor { strategy: self })
    }
}

impl ContainerStrategy for OptionalStrategy {
    #[inline]
    fn family(&self) -> Family {
        Family::ScalarWrapper(WrapperKind::Optional)
    }

    #[inline]
    fn descriptor(&self) -> Option<&TypeDescriptor> {
        Some(&self.descriptor)
    }

    fn children(&self) -> Children {
        Children {
            key: None,
            content: Some(Arc::clone(&self.value)),
            content_discriminator: self.discriminator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OptionalStrategy;
    use crate::Value;
    use crate::de::{DeserializeDriver, StringDeserializer};
    use crate::info::{TypeDescriptor, classes};
    use alloc::sync::Arc;
    use serde_core::de::DeserializeSeed;

    fn strategy() -> OptionalStrategy {
        let reference = TypeDescriptor::of(&classes::STRING);
        OptionalStrategy::new(
            TypeDescriptor::collection(&classes::OPTIONAL, reference.clone()),
            reference,
            Arc::new(StringDeserializer),
            None,
        )
    }

    fn read_json(input: &str) -> Value {
        let mut input = serde_json::Deserializer::from_str(input);
        DeserializeDriver::new(&strategy())
            .deserialize(&mut input)
            .unwrap()
    }

    fn read_ron(input: &str) -> Value {
        let mut input = ron::Deserializer::from_str(input).unwrap();
        DeserializeDriver::new(&strategy())
            .deserialize(&mut input)
            .unwrap()
    }

    #[test]
    fn json_null_is_absent() {
        assert_eq!(read_json("null").as_optional(), Some(None));
        assert_eq!(
            read_json(r#""x""#).as_optional(),
            Some(Some(&Value::from("x")))
        );
    }

    #[test]
    fn ron_options() {
        assert_eq!(read_ron("None"), Value::Optional(None));
        assert_eq!(
            read_ron(r#"Some("y")"#).as_optional(),
            Some(Some(&Value::from("y")))
        );
    }
}
