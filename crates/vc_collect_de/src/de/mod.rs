//! Type-erased deserializers and the [`DeserializeSeed`] adapter that runs them.
//!
//! Every strategy, scalar deserializer and discriminator works on a
//! `&mut dyn erased_serde::Deserializer`, so one resolved deserializer can read
//! from any `serde` format.

use core::fmt;

use serde_core::Deserializer;
use serde_core::de::{DeserializeSeed, Error};

use crate::Value;
use crate::info::RawClass;

mod discriminator;
mod scalar;

pub use discriminator::WrapperObjectDiscriminator;
pub use scalar::{
    BoolDeserializer, FloatDeserializer, IntDeserializer, StringDeserializer, UIntDeserializer,
    UntypedDeserializer,
};

// -----------------------------------------------------------------------------
// Traits

/// Reads one [`Value`] from an erased deserializer.
///
/// Implementors are stateless templates shared across threads: every call
/// produces an independent value.
pub trait ValueDeserializer: Send + Sync + fmt::Debug {
    fn deserialize<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error>;
}

/// Reads a polymorphic value whose concrete type is named in the input.
pub trait TypeDiscriminator: Send + Sync + fmt::Debug {
    /// The base class this discriminator resolves subtypes of.
    fn base_class(&self) -> &'static RawClass;

    fn deserialize_typed<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error>;
}

// -----------------------------------------------------------------------------
// DeserializeDriver

/// A [`DeserializeSeed`] that runs a [`ValueDeserializer`], or a
/// [`TypeDiscriminator`] when one is given.
///
/// Strategies use it to read each child value; callers use it to read a
/// top-level value from a concrete format.
///
/// # Examples
///
/// ```
/// use serde_core::de::DeserializeSeed;
/// use vc_collect_de::Value;
/// use vc_collect_de::de::{DeserializeDriver, IntDeserializer};
///
/// let mut input = serde_json::Deserializer::from_str("42");
/// let value = DeserializeDriver::new(&IntDeserializer).deserialize(&mut input).unwrap();
/// assert_eq!(value, Value::Int(42));
/// ```
#[derive(Clone, Copy)]
pub struct DeserializeDriver<'a> {
    deserializer: &'a dyn ValueDeserializer,
    discriminator: Option<&'a dyn TypeDiscriminator>,
}

impl<'a> DeserializeDriver<'a> {
    #[inline]
    pub fn new(deserializer: &'a dyn ValueDeserializer) -> Self {
        Self {
            deserializer,
            discriminator: None,
        }
    }

    /// Reads through `discriminator` when it is `Some`.
    #[inline]
    pub fn with_discriminator(
        deserializer: &'a dyn ValueDeserializer,
        discriminator: Option<&'a dyn TypeDiscriminator>,
    ) -> Self {
        Self {
            deserializer,
            discriminator,
        }
    }
}

impl<'de> DeserializeSeed<'de> for DeserializeDriver<'_> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        match self.discriminator {
            Some(discriminator) => discriminator.deserialize_typed(&mut erased),
            None => self.deserializer.deserialize(&mut erased),
        }
        .map_err(D::Error::custom)
    }
}
