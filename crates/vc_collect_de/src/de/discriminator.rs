use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use serde_core::Deserializer;
use serde_core::de::{Error, IgnoredAny, MapAccess, Visitor};
use vc_collections::hash::HashMap;

use super::{DeserializeDriver, TypeDiscriminator, ValueDeserializer};
use crate::Value;
use crate::info::RawClass;

// -----------------------------------------------------------------------------
// WrapperObjectDiscriminator

/// Reads polymorphic values written as a single-entry object keyed by the
/// subtype id, e.g. `{"Circle": {"radius": 2}}`.
///
/// The payload is read with the deserializer registered for that id and
/// returned as [`Value::Tagged`]. `null` passes through as [`Value::Null`] so
/// that the enclosing container decides whether it is allowed.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use serde_core::de::DeserializeSeed;
/// use vc_collect_de::Value;
/// use vc_collect_de::de::{DeserializeDriver, UntypedDeserializer, WrapperObjectDiscriminator};
/// use vc_collect_de::info::classes;
///
/// let shapes = WrapperObjectDiscriminator::new(&classes::UNKNOWN)
///     .with_subtype("Circle", Arc::new(UntypedDeserializer));
///
/// let mut input = serde_json::Deserializer::from_str(r#"{"Circle": 2}"#);
/// let value = DeserializeDriver::with_discriminator(&UntypedDeserializer, Some(&shapes))
///     .deserialize(&mut input)
///     .unwrap();
///
/// assert_eq!(value, Value::Tagged("Circle".into(), Box::new(Value::Int(2))));
/// ```
#[derive(Clone)]
pub struct WrapperObjectDiscriminator {
    base: &'static RawClass,
    subtypes: HashMap<String, Arc<dyn ValueDeserializer>>,
}

impl WrapperObjectDiscriminator {
    pub fn new(base: &'static RawClass) -> Self {
        Self {
            base,
            subtypes: HashMap::default(),
        }
    }

    /// Registers the deserializer for payloads tagged `id`.
    pub fn register_subtype(
        &mut self,
        id: impl Into<String>,
        deserializer: Arc<dyn ValueDeserializer>,
    ) {
        self.subtypes.insert(id.into(), deserializer);
    }

    #[inline]
    pub fn with_subtype(
        mut self,
        id: impl Into<String>,
        deserializer: Arc<dyn ValueDeserializer>,
    ) -> Self {
        self.register_subtype(id, deserializer);
        self
    }
}

impl fmt::Debug for WrapperObjectDiscriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapperObjectDiscriminator")
            .field("base", &self.base)
            .field("subtypes", &self.subtypes.keys())
            .finish()
    }
}

struct WrapperObjectVisitor<'a> {
    discriminator: &'a WrapperObjectDiscriminator,
}

impl<'de> Visitor<'de> for WrapperObjectVisitor<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "a `{}` wrapped in a single-entry object",
            self.discriminator.base
        )
    }

    fn visit_unit<E: Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let base = self.discriminator.base;
        let Some(id) = map.next_key::<String>()? else {
            return Err(Error::custom(format!("missing type id for `{base}`")));
        };
        let Some(deserializer) = self.discriminator.subtypes.get(&id) else {
            return Err(Error::custom(format!("unknown type id `{id}` for `{base}`")));
        };
        let payload = map.next_value_seed(DeserializeDriver::new(&**deserializer))?;
        if map.next_key::<IgnoredAny>()?.is_some() {
            return Err(Error::custom(format!(
                "expected a single type id entry for `{base}`, found more"
            )));
        }
        Ok(Value::Tagged(id, Box::new(payload)))
    }
}

impl TypeDiscriminator for WrapperObjectDiscriminator {
    #[inline]
    fn base_class(&self) -> &'static RawClass {
        self.base
    }

    fn deserialize_typed<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        deserializer.deserialize_any(WrapperObjectVisitor {
            discriminator: self,
        })
    }
}
