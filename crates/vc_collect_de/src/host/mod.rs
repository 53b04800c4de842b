//! A host that turns type descriptors into ready-to-use deserializers.
//!
//! [`DeserializerFactory`] resolves type parameters first, hands the
//! contextualized descriptor to [`dispatch`], and falls back to plain
//! sequence and map readers for anything no resolver claims. With the `std`
//! feature, results for descriptors without attached handlers are cached.

use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;

use serde_core::Deserializer;
use serde_core::de::{DeserializeSeed, Error};

use crate::de::{DeserializeDriver, TypeDiscriminator, ValueDeserializer};
use crate::info::{TypeDescriptor, classes};
use crate::resolve::{ContainerDeserializers, Deserializers, Resolution, dispatch};
use crate::strategy::Children;
use crate::{DeserializeConfig, ResolveError, Value};

mod fallback;

use fallback::{DefaultMapDeserializer, DefaultSeqDeserializer};

#[cfg(feature = "std")]
use std::sync::{PoisonError, RwLock};

#[cfg(feature = "std")]
use vc_collections::hash::HashMap;

// -----------------------------------------------------------------------------
// DeserializerFactory

/// Finds the deserializer for any descriptor, resolving type parameters
/// recursively.
///
/// # Examples
///
/// ```
/// use vc_collect_de::{Collection, DeserializeConfig, Value};
/// use vc_collect_de::host::DeserializerFactory;
/// use vc_collect_de::info::{TypeDescriptor, classes};
///
/// let factory = DeserializerFactory::new(DeserializeConfig::new());
/// let ty =
///     TypeDescriptor::collection(&classes::IMMUTABLE_LIST, TypeDescriptor::of(&classes::I64));
///
/// let mut input = serde_json::Deserializer::from_str("[3, 1, 2]");
/// let value = factory.deserialize(&ty, &mut input).unwrap();
/// let list = value.as_collection().and_then(Collection::as_list).unwrap();
/// assert_eq!(list.as_slice(), [Value::Int(3), Value::Int(1), Value::Int(2)]);
/// ```
#[derive(Debug)]
pub struct DeserializerFactory<D: Deserializers = ContainerDeserializers> {
    config: DeserializeConfig,
    deserializers: D,
    #[cfg(feature = "std")]
    cache: RwLock<HashMap<TypeDescriptor, Arc<dyn ValueDeserializer>>>,
}

impl DeserializerFactory {
    /// A factory using the container resolvers of this crate.
    #[inline]
    pub fn new(config: DeserializeConfig) -> Self {
        Self::with_deserializers(config, ContainerDeserializers)
    }
}

impl Default for DeserializerFactory {
    #[inline]
    fn default() -> Self {
        Self::new(DeserializeConfig::new())
    }
}

impl<D: Deserializers> DeserializerFactory<D> {
    pub fn with_deserializers(config: DeserializeConfig, deserializers: D) -> Self {
        Self {
            config,
            deserializers,
            #[cfg(feature = "std")]
            cache: RwLock::new(HashMap::default()),
        }
    }

    #[inline]
    pub fn config(&self) -> &DeserializeConfig {
        &self.config
    }

    #[inline]
    pub fn deserializers(&self) -> &D {
        &self.deserializers
    }

    /// Returns the deserializer for `descriptor`.
    ///
    /// A value handler attached to the descriptor wins outright. Otherwise
    /// each type parameter is resolved first and attached to a copy of the
    /// descriptor, which is then dispatched to the resolvers.
    ///
    /// # Errors
    ///
    /// Any [`ResolveError`] raised for the descriptor or one of its type
    /// parameters, or [`ResolveError::NoDeserializer`] when nothing reads it.
    pub fn find_deserializer(
        &self,
        descriptor: &TypeDescriptor,
    ) -> Result<Arc<dyn ValueDeserializer>, ResolveError> {
        if let Some(handler) = descriptor.value_handler() {
            return Ok(Arc::clone(handler));
        }

        if let Some(found) = self.cached(descriptor) {
            return Ok(found);
        }
        let found = self.build(descriptor)?;
        Ok(self.remember(descriptor, found))
    }

    /// Resolves `descriptor` and reads one value of it from `deserializer`.
    pub fn deserialize<'de, T: Deserializer<'de>>(
        &self,
        descriptor: &TypeDescriptor,
        deserializer: T,
    ) -> Result<Value, T::Error> {
        let found = self
            .find_deserializer(descriptor)
            .map_err(T::Error::custom)?;
        DeserializeDriver::new(&*found).deserialize(deserializer)
    }

    #[cfg(feature = "std")]
    fn cached(&self, descriptor: &TypeDescriptor) -> Option<Arc<dyn ValueDeserializer>> {
        if !is_plain(descriptor) {
            return None;
        }
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache.get(descriptor).cloned()
    }

    #[cfg(not(feature = "std"))]
    #[inline]
    fn cached(&self, _descriptor: &TypeDescriptor) -> Option<Arc<dyn ValueDeserializer>> {
        None
    }

    /// Caches `found` unless another thread got there first, in which case
    /// the earlier entry is returned.
    #[cfg(feature = "std")]
    fn remember(
        &self,
        descriptor: &TypeDescriptor,
        found: Arc<dyn ValueDeserializer>,
    ) -> Arc<dyn ValueDeserializer> {
        if !is_plain(descriptor) {
            return found;
        }
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(descriptor.clone()).or_insert(found))
    }

    #[cfg(not(feature = "std"))]
    #[inline]
    fn remember(
        &self,
        _descriptor: &TypeDescriptor,
        found: Arc<dyn ValueDeserializer>,
    ) -> Arc<dyn ValueDeserializer> {
        found
    }

    fn build(
        &self,
        descriptor: &TypeDescriptor,
    ) -> Result<Arc<dyn ValueDeserializer>, ResolveError> {
        let params = descriptor
            .type_params()
            .iter()
            .map(|param| {
                let handler = self.find_deserializer(param)?;
                Ok(param.clone().with_value_handler(handler))
            })
            .collect::<Result<Vec<_>, ResolveError>>()?;
        let contextual = descriptor.clone().with_type_params(params);

        let children = Children {
            key: contextual
                .key_type()
                .and_then(TypeDescriptor::value_handler)
                .cloned(),
            content: contextual
                .content_type()
                .and_then(TypeDescriptor::value_handler)
                .cloned(),
            content_discriminator: self.content_discriminator(&contextual),
        };

        match dispatch(&self.deserializers, &contextual, &children, &self.config)? {
            Resolution::Resolved(strategy) => Ok(strategy.into_deserializer()),
            Resolution::NotHandled => self.fallback(&contextual, children),
        }
    }

    fn content_discriminator(
        &self,
        descriptor: &TypeDescriptor,
    ) -> Option<Arc<dyn TypeDiscriminator>> {
        let content = descriptor.content_type()?;
        content
            .type_handler()
            .cloned()
            .or_else(|| self.config.find_discriminator(content))
    }

    fn fallback(
        &self,
        descriptor: &TypeDescriptor,
        children: Children,
    ) -> Result<Arc<dyn ValueDeserializer>, ResolveError> {
        if let Some(scalar) = self.config.find_scalar(descriptor) {
            return Ok(scalar);
        }
        if *descriptor.raw_class() == classes::UNKNOWN {
            return Ok(self.config.untyped());
        }

        let Children {
            key,
            content,
            content_discriminator,
        } = children;
        let content = content.unwrap_or_else(|| self.config.untyped());

        if descriptor.is_assignable_to(&classes::MAP) {
            return Ok(Arc::new(DefaultMapDeserializer {
                key: key.unwrap_or_else(|| self.config.untyped()),
                value: content,
                discriminator: content_discriminator,
            }));
        }
        if descriptor.is_assignable_to(&classes::COLLECTION) {
            return Ok(Arc::new(DefaultSeqDeserializer {
                element: content,
                discriminator: content_discriminator,
            }));
        }

        log::debug!("nothing reads `{descriptor}`");
        Err(ResolveError::NoDeserializer(descriptor.to_string()))
    }
}

/// `true` if neither the descriptor nor any nested parameter carries a handler.
#[cfg(feature = "std")]
fn is_plain(descriptor: &TypeDescriptor) -> bool {
    !descriptor.has_handlers() && descriptor.type_params().iter().all(is_plain)
}

#[cfg(test)]
mod tests {
    use super::DeserializerFactory;
    use crate::de::{DeserializeDriver, IntDeserializer, ValueDeserializer};
    use crate::info::{RawClass, TypeDescriptor, classes};
    use crate::{Collection, DeserializeConfig, ResolveError, Value};
    use alloc::string::ToString;
    use alloc::sync::Arc;
    use alloc::vec;
    use serde_core::de::DeserializeSeed;

    fn read(factory: &DeserializerFactory, ty: &TypeDescriptor, text: &str) -> Value {
        let mut input = serde_json::Deserializer::from_str(text);
        factory.deserialize(ty, &mut input).unwrap()
    }

    fn int() -> TypeDescriptor {
        TypeDescriptor::of(&classes::I64)
    }

    #[test]
    fn immutable_list_keeps_order() {
        let factory = DeserializerFactory::new(DeserializeConfig::new());
        let ty = TypeDescriptor::collection(&classes::IMMUTABLE_LIST, int());
        let value = read(&factory, &ty, "[3, 1, 2]");
        let list = value.as_collection().and_then(Collection::as_list).unwrap();
        assert_eq!(
            list.as_slice(),
            [Value::Int(3), Value::Int(1), Value::Int(2)]
        );
    }

    #[test]
    fn nested_parameters() {
        let factory = DeserializerFactory::default();
        let list = TypeDescriptor::collection(&classes::IMMUTABLE_LIST, int());
        let ty = TypeDescriptor::with_params(&classes::OPTIONAL, vec![list]);

        assert_eq!(read(&factory, &ty, "null"), Value::Optional(None));

        let value = read(&factory, &ty, "[2, 1]");
        let Some(Some(inner)) = value.as_optional() else {
            panic!("expected a present optional, got {value:?}");
        };
        let list = inner.as_collection().and_then(Collection::as_list).unwrap();
        assert_eq!(list.len(), 2);

        let mut input = serde_json::Deserializer::from_str(r#"["x"]"#);
        assert!(factory.deserialize(&ty, &mut input).is_err());
    }

    #[test]
    fn unclaimed_containers_use_plain_readers() {
        let factory = DeserializerFactory::default();

        let vec = TypeDescriptor::collection(&classes::VEC, int());
        assert_eq!(
            read(&factory, &vec, "[1, 2]"),
            Value::Seq(vec![Value::Int(1), Value::Int(2)])
        );

        let map = TypeDescriptor::map(
            &classes::HASH_MAP,
            TypeDescriptor::of(&classes::STRING),
            int(),
        );
        assert_eq!(
            read(&factory, &map, r#"{"a": 1}"#),
            Value::Map(vec![(Value::from("a"), Value::Int(1))])
        );
    }

    #[test]
    fn errors() {
        static WIDGET: RawClass = RawClass::new("app::Widget", &[]);
        let factory = DeserializerFactory::default();
        let string = || TypeDescriptor::of(&classes::STRING);

        let table = TypeDescriptor::with_params(&classes::TABLE, vec![string(), string(), int()]);
        let err = factory.find_deserializer(&table).unwrap_err();
        assert_eq!(
            err,
            ResolveError::NoDeserializer("Table<String, String, i64>".to_string())
        );

        let widgets =
            TypeDescriptor::collection(&classes::IMMUTABLE_LIST, TypeDescriptor::of(&WIDGET));
        assert_eq!(
            factory.find_deserializer(&widgets).unwrap_err(),
            ResolveError::NoDeserializer("Widget".to_string())
        );

        let floats = TypeDescriptor::collection(
            &classes::IMMUTABLE_SORTED_SET,
            TypeDescriptor::of(&classes::F64),
        );
        assert!(matches!(
            factory.find_deserializer(&floats),
            Err(ResolveError::UnorderableElement { .. })
        ));

        let mut input = serde_json::Deserializer::from_str("[]");
        let err = factory
            .deserialize(&floats, &mut input)
            .unwrap_err()
            .to_string();
        assert!(err.contains("not orderable"), "{err}");
    }

    #[test]
    fn attached_handler_wins() {
        let factory = DeserializerFactory::default();
        let handler: Arc<dyn ValueDeserializer> = Arc::new(IntDeserializer);
        let ty = TypeDescriptor::of(&classes::STRING).with_value_handler(Arc::clone(&handler));
        assert!(Arc::ptr_eq(&factory.find_deserializer(&ty).unwrap(), &handler));

        let mut input = serde_json::Deserializer::from_str("7");
        let found = factory.find_deserializer(&ty).unwrap();
        let value = DeserializeDriver::new(&*found)
            .deserialize(&mut input)
            .unwrap();
        assert_eq!(value, Value::Int(7));
    }

    #[cfg(feature = "std")]
    #[test]
    fn resolutions_are_cached() {
        let factory = DeserializerFactory::new(DeserializeConfig::new());
        let ty = TypeDescriptor::map(
            &classes::HASH_MULTIMAP,
            TypeDescriptor::of(&classes::STRING),
            int(),
        );

        let first = factory.find_deserializer(&ty).unwrap();
        let second = factory.find_deserializer(&ty).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let found = std::thread::scope(|scope| {
            let handles = [
                scope.spawn(|| factory.find_deserializer(&ty).unwrap()),
                scope.spawn(|| factory.find_deserializer(&ty).unwrap()),
            ];
            handles.map(|handle| handle.join().unwrap())
        });
        assert!(found.iter().all(|each| Arc::ptr_eq(each, &first)));
    }
}
