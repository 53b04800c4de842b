//! Container strategies: the deserializers resolvers hand back.
//!
//! A strategy is a stateless template built once per resolution. It holds the
//! descriptor it was resolved for, the child deserializers it delegates
//! to, and any polymorphic discriminator for its contents. Each call to
//! [`ValueDeserializer::deserialize`] accumulates a fresh container.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;

use serde_core::Deserializer;
use serde_core::de::value::MapAccessDeserializer;
use serde_core::de::{
    DeserializeSeed, Error, IntoDeserializer, MapAccess, SeqAccess, Unexpected, Visitor,
};

use crate::Value;
use crate::de::{DeserializeDriver, TypeDiscriminator, ValueDeserializer};
use crate::family::{Family, Policy};
use crate::info::TypeDescriptor;

mod host_and_port;
mod map;
mod multimap;
mod optional;
mod range;
mod sequence;

pub use host_and_port::{HOST_AND_PORT, HostAndPortStrategy};
pub use map::{MapStrategy, MapTarget};
pub use multimap::{MultimapStrategy, MultimapTarget};
pub use optional::OptionalStrategy;
pub use range::RangeStrategy;
pub use sequence::{SequenceStrategy, SequenceTarget};

// -----------------------------------------------------------------------------
// ContainerStrategy

/// The child deserializers a strategy delegates to.
#[derive(Debug, Clone, Default)]
pub struct Children {
    pub key: Option<Arc<dyn ValueDeserializer>>,
    pub content: Option<Arc<dyn ValueDeserializer>>,
    pub content_discriminator: Option<Arc<dyn TypeDiscriminator>>,
}

fn same<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Children are equal when they share the same deserializer instances.
impl PartialEq for Children {
    fn eq(&self, other: &Self) -> bool {
        same(&self.key, &other.key)
            && same(&self.content, &other.content)
            && same(&self.content_discriminator, &other.content_discriminator)
    }
}

/// A resolved deserializer for one container family.
pub trait ContainerStrategy: ValueDeserializer {
    fn family(&self) -> Family;

    /// The descriptor this strategy was resolved for; `None` for shared
    /// strategies that serve every descriptor of their class.
    fn descriptor(&self) -> Option<&TypeDescriptor> {
        None
    }

    fn children(&self) -> Children;
}

// -----------------------------------------------------------------------------
// Strategy

/// A handle to a resolved strategy.
///
/// Stateless strategies are `'static` singletons shared by every resolution;
/// the others are built per resolution and reference counted.
#[derive(Clone)]
pub enum Strategy {
    Shared(&'static dyn ContainerStrategy),
    Owned(Arc<dyn ContainerStrategy>),
}

impl Strategy {
    #[inline]
    pub fn owned(strategy: impl ContainerStrategy + 'static) -> Self {
        Strategy::Owned(Arc::new(strategy))
    }

    #[inline]
    pub fn is_shared(&self) -> bool {
        matches!(self, Strategy::Shared(_))
    }

    #[inline]
    pub fn policy(&self) -> Policy {
        self.family().policy()
    }

    /// Converts the handle into a plain shared deserializer.
    pub fn into_deserializer(self) -> Arc<dyn ValueDeserializer> {
        match self {
            Strategy::Owned(strategy) => strategy,
            shared @ Strategy::Shared(_) => Arc::new(shared),
        }
    }
}

impl Deref for Strategy {
    type Target = dyn ContainerStrategy;

    #[inline]
    fn deref(&self) -> &Self::Target {
        match self {
            Strategy::Shared(strategy) => *strategy,
            Strategy::Owned(strategy) => &**strategy,
        }
    }
}

impl ValueDeserializer for Strategy {
    #[inline]
    fn deserialize<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        (**self).deserialize(deserializer)
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Shared(strategy) => f.debug_tuple("Shared").field(strategy).finish(),
            Strategy::Owned(strategy) => f.debug_tuple("Owned").field(strategy).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// Shared accumulation helpers

/// Reads a run of elements, optionally accepting a lone value as a
/// one-element run.
#[derive(Clone, Copy)]
pub(crate) struct ElementsSeed<'a> {
    pub element: DeserializeDriver<'a>,
    pub single_value: bool,
    pub descriptor: &'a TypeDescriptor,
}

impl<'de> DeserializeSeed<'de> for ElementsSeed<'_> {
    type Value = Vec<Value>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        if self.single_value {
            deserializer.deserialize_any(self)
        } else {
            deserializer.deserialize_seq(self)
        }
    }
}

impl ElementsSeed<'_> {
    fn accept_single<E: Error>(&self, unexpected: Unexpected) -> Result<(), E> {
        if self.single_value {
            Ok(())
        } else {
            Err(E::invalid_type(unexpected, self))
        }
    }

    fn single<'de, D: Deserializer<'de>>(self, deserializer: D) -> Result<Vec<Value>, D::Error> {
        Ok(vec![self.element.deserialize(deserializer)?])
    }
}

impl<'de> Visitor<'de> for ElementsSeed<'_> {
    type Value = Vec<Value>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "a sequence of elements for `{}`",
            self.descriptor
        )
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(item) = seq.next_element_seed(self.element)? {
            items.push(item);
        }
        Ok(items)
    }

    fn visit_bool<E: Error>(self, v: bool) -> Result<Self::Value, E> {
        self.accept_single(Unexpected::Bool(v))?;
        self.single(v.into_deserializer())
    }

    fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
        self.accept_single(Unexpected::Signed(v))?;
        self.single(v.into_deserializer())
    }

    fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
        self.accept_single(Unexpected::Unsigned(v))?;
        self.single(v.into_deserializer())
    }

    fn visit_f64<E: Error>(self, v: f64) -> Result<Self::Value, E> {
        self.accept_single(Unexpected::Float(v))?;
        self.single(v.into_deserializer())
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
        self.accept_single(Unexpected::Str(v))?;
        self.single(v.into_deserializer())
    }

    fn visit_string<E: Error>(self, v: alloc::string::String) -> Result<Self::Value, E> {
        self.accept_single(Unexpected::Str(&v))?;
        self.single(v.into_deserializer())
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        self.accept_single(Unexpected::Unit)?;
        self.single(().into_deserializer())
    }

    fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
        self.accept_single(Unexpected::Option)?;
        self.single(().into_deserializer())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        self.accept_single(Unexpected::Option)?;
        self.single(deserializer)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        self.accept_single(Unexpected::Map)?;
        self.single(MapAccessDeserializer::new(map))
    }
}

/// Fails on the first `null` unless nulls are allowed.
pub(crate) fn reject_nulls<'v, E: Error>(
    values: impl IntoIterator<Item = &'v Value>,
    allow: bool,
    descriptor: &TypeDescriptor,
) -> Result<(), E> {
    if !allow && values.into_iter().any(Value::is_null) {
        return Err(E::custom(alloc::format!("null value in immutable `{descriptor}`")));
    }
    Ok(())
}
