use alloc::sync::Arc;
use core::fmt;

use bitflags::bitflags;
use vc_collections::hash::HashMap;

use crate::de::{
    BoolDeserializer, FloatDeserializer, IntDeserializer, StringDeserializer, TypeDiscriminator,
    UIntDeserializer, UntypedDeserializer, ValueDeserializer,
};
use crate::info::{RawClass, TypeDescriptor, classes};

// -----------------------------------------------------------------------------
// DeserializeFeatures

bitflags! {
    /// Switches that relax how strategies read their input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeserializeFeatures: u8 {
        /// Read a lone scalar where a sequence is expected as a one-element
        /// sequence. Also applies to multimap buckets.
        const ACCEPT_SINGLE_VALUE_AS_ARRAY = 1 << 0;
        /// Let immutable containers hold `null` elements and values.
        const ALLOW_NULL_ELEMENTS          = 1 << 1;
    }
}

impl Default for DeserializeFeatures {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

// -----------------------------------------------------------------------------
// DeserializeConfig

/// Read-only context handed to every resolver.
///
/// Holds the feature switches, deserializers for scalar classes, and
/// discriminators for polymorphic base classes.
///
/// # Examples
///
/// ```
/// use vc_collect_de::{DeserializeConfig, DeserializeFeatures};
/// use vc_collect_de::info::{TypeDescriptor, classes};
///
/// let config = DeserializeConfig::new()
///     .with_feature(DeserializeFeatures::ACCEPT_SINGLE_VALUE_AS_ARRAY);
///
/// assert!(config.is_enabled(DeserializeFeatures::ACCEPT_SINGLE_VALUE_AS_ARRAY));
/// assert!(config.find_scalar(&TypeDescriptor::of(&classes::I64)).is_some());
/// assert!(config.find_discriminator(&TypeDescriptor::of(&classes::I64)).is_none());
/// ```
#[derive(Clone)]
pub struct DeserializeConfig {
    features: DeserializeFeatures,
    scalars: HashMap<&'static str, Arc<dyn ValueDeserializer>>,
    discriminators: HashMap<&'static str, Arc<dyn TypeDiscriminator>>,
    untyped: Arc<dyn ValueDeserializer>,
}

impl DeserializeConfig {
    /// A config with the built-in scalar deserializers registered.
    pub fn new() -> Self {
        Self::empty()
            .with_scalar(&classes::BOOL, Arc::new(BoolDeserializer))
            .with_scalar(&classes::I64, Arc::new(IntDeserializer))
            .with_scalar(&classes::U64, Arc::new(UIntDeserializer))
            .with_scalar(&classes::F64, Arc::new(FloatDeserializer))
            .with_scalar(&classes::STRING, Arc::new(StringDeserializer))
            .with_scalar(&classes::UNKNOWN, Arc::new(UntypedDeserializer))
    }

    /// A config with nothing registered.
    pub fn empty() -> Self {
        Self {
            features: DeserializeFeatures::empty(),
            scalars: HashMap::default(),
            discriminators: HashMap::default(),
            untyped: Arc::new(UntypedDeserializer),
        }
    }

    #[inline]
    pub fn features(&self) -> DeserializeFeatures {
        self.features
    }

    #[inline]
    pub fn is_enabled(&self, feature: DeserializeFeatures) -> bool {
        self.features.contains(feature)
    }

    #[inline]
    pub fn with_feature(mut self, feature: DeserializeFeatures) -> Self {
        self.features.insert(feature);
        self
    }

    #[inline]
    pub fn without_feature(mut self, feature: DeserializeFeatures) -> Self {
        self.features.remove(feature);
        self
    }

    /// Registers the deserializer for values of exactly `class`.
    pub fn register_scalar(
        &mut self,
        class: &'static RawClass,
        deserializer: Arc<dyn ValueDeserializer>,
    ) {
        self.scalars.insert(class.path(), deserializer);
    }

    #[inline]
    pub fn with_scalar(
        mut self,
        class: &'static RawClass,
        deserializer: Arc<dyn ValueDeserializer>,
    ) -> Self {
        self.register_scalar(class, deserializer);
        self
    }

    /// Registers the discriminator for polymorphic values of `base`.
    pub fn register_discriminator(
        &mut self,
        base: &'static RawClass,
        discriminator: Arc<dyn TypeDiscriminator>,
    ) {
        self.discriminators.insert(base.path(), discriminator);
    }

    #[inline]
    pub fn with_discriminator(
        mut self,
        base: &'static RawClass,
        discriminator: Arc<dyn TypeDiscriminator>,
    ) -> Self {
        self.register_discriminator(base, discriminator);
        self
    }

    /// The registered deserializer for the class of `descriptor`.
    pub fn find_scalar(&self, descriptor: &TypeDescriptor) -> Option<Arc<dyn ValueDeserializer>> {
        self.scalars.get(descriptor.raw_class().path()).cloned()
    }

    /// The registered discriminator for the class of `descriptor`.
    pub fn find_discriminator(
        &self,
        descriptor: &TypeDescriptor,
    ) -> Option<Arc<dyn TypeDiscriminator>> {
        self.discriminators
            .get(descriptor.raw_class().path())
            .cloned()
    }

    /// The self-describing fallback deserializer.
    #[inline]
    pub fn untyped(&self) -> Arc<dyn ValueDeserializer> {
        Arc::clone(&self.untyped)
    }
}

impl Default for DeserializeConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DeserializeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeserializeConfig")
            .field("features", &self.features)
            .field("scalars", &self.scalars.keys())
            .field("discriminators", &self.discriminators.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{DeserializeConfig, DeserializeFeatures};
    use crate::de::{IntDeserializer, ValueDeserializer, WrapperObjectDiscriminator};
    use crate::info::{RawClass, TypeDescriptor, classes};
    use alloc::sync::Arc;

    static SHAPE: RawClass = RawClass::new("app::Shape", &[]);

    #[test]
    fn features_toggle() {
        let config = DeserializeConfig::new()
            .with_feature(DeserializeFeatures::ALLOW_NULL_ELEMENTS)
            .with_feature(DeserializeFeatures::ACCEPT_SINGLE_VALUE_AS_ARRAY)
            .without_feature(DeserializeFeatures::ACCEPT_SINGLE_VALUE_AS_ARRAY);
        assert_eq!(config.features(), DeserializeFeatures::ALLOW_NULL_ELEMENTS);
        assert!(DeserializeConfig::default().features().is_empty());
    }

    #[test]
    fn registries_key_on_the_exact_class() {
        let string = TypeDescriptor::of(&classes::STRING);
        let number = TypeDescriptor::of(&classes::I64);
        assert!(DeserializeConfig::empty().find_scalar(&number).is_none());
        assert!(DeserializeConfig::new().find_scalar(&number).is_some());

        let int: Arc<dyn ValueDeserializer> = Arc::new(IntDeserializer);
        let config = DeserializeConfig::empty().with_scalar(&classes::STRING, Arc::clone(&int));
        let found = config.find_scalar(&string).unwrap();
        assert!(Arc::ptr_eq(&found, &int));

        let config =
            config.with_discriminator(&SHAPE, Arc::new(WrapperObjectDiscriminator::new(&SHAPE)));
        let discriminator = config
            .find_discriminator(&TypeDescriptor::of(&SHAPE))
            .unwrap();
        assert_eq!(discriminator.base_class(), &SHAPE);
        assert!(config.find_discriminator(&string).is_none());
    }
}
