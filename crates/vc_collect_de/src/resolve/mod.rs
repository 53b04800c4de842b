//! Resolvers: from a type descriptor to a container strategy.
//!
//! Each resolver classifies the descriptor with its own chains from
//! [`taxonomy`](crate::taxonomy), validates family constraints, and builds
//! the strategy with the child deserializers it was given. Resolution never
//! reads input and never caches; the host calls [`dispatch`] once per shape.

use alloc::sync::Arc;

use crate::de::{TypeDiscriminator, ValueDeserializer};
use crate::family::Family;
use crate::info::TypeDescriptor;
use crate::strategy::{Children, Strategy};
use crate::{DeserializeConfig, ResolveError};

mod collection;
mod map;
mod map_like;
mod scalar;

pub use collection::resolve_collection;
pub use map::resolve_map;
pub use map_like::resolve_map_like;
pub use scalar::resolve_scalar;

// -----------------------------------------------------------------------------
// Resolution

/// The outcome of a resolver that did not fail.
#[derive(Debug, Clone)]
pub enum Resolution {
    Resolved(Strategy),
    /// The descriptor is not this resolver's to handle. Not an error: the
    /// caller moves on to the next resolver or its own default.
    NotHandled,
}

impl Resolution {
    #[inline]
    pub fn is_handled(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    #[inline]
    pub fn strategy(&self) -> Option<&Strategy> {
        match self {
            Resolution::Resolved(strategy) => Some(strategy),
            Resolution::NotHandled => None,
        }
    }

    #[inline]
    pub fn into_strategy(self) -> Option<Strategy> {
        match self {
            Resolution::Resolved(strategy) => Some(strategy),
            Resolution::NotHandled => None,
        }
    }
}

/// Logs and returns `NotHandled` for a family without a strategy.
fn unimplemented_family(descriptor: &TypeDescriptor, family: Family) -> Resolution {
    log::debug!("`{descriptor}` is a {family}, which has no strategy; leaving it to the host");
    Resolution::NotHandled
}

fn resolved(descriptor: &TypeDescriptor, strategy: Strategy) -> Resolution {
    log::trace!(
        "resolved `{descriptor}` to the {} strategy",
        strategy.family()
    );
    Resolution::Resolved(strategy)
}

// -----------------------------------------------------------------------------
// Deserializers

/// A module of resolvers, queried by [`dispatch`] in a fixed order.
///
/// Every method defaults to [`Resolution::NotHandled`], so an implementor
/// overrides only the shapes it knows.
pub trait Deserializers: Send + Sync {
    fn find_collection_deserializer(
        &self,
        descriptor: &TypeDescriptor,
        config: &DeserializeConfig,
        discriminator: Option<Arc<dyn TypeDiscriminator>>,
        element: Arc<dyn ValueDeserializer>,
    ) -> Result<Resolution, ResolveError> {
        let _ = (descriptor, config, discriminator, element);
        Ok(Resolution::NotHandled)
    }

    fn find_map_deserializer(
        &self,
        descriptor: &TypeDescriptor,
        config: &DeserializeConfig,
        key: Arc<dyn ValueDeserializer>,
        discriminator: Option<Arc<dyn TypeDiscriminator>>,
        value: Arc<dyn ValueDeserializer>,
    ) -> Result<Resolution, ResolveError> {
        let _ = (descriptor, config, key, discriminator, value);
        Ok(Resolution::NotHandled)
    }

    fn find_map_like_deserializer(
        &self,
        descriptor: &TypeDescriptor,
        config: &DeserializeConfig,
        key: Arc<dyn ValueDeserializer>,
        discriminator: Option<Arc<dyn TypeDiscriminator>>,
        value: Arc<dyn ValueDeserializer>,
    ) -> Result<Resolution, ResolveError> {
        let _ = (descriptor, config, key, discriminator, value);
        Ok(Resolution::NotHandled)
    }

    /// Last resort for single-value types.
    fn find_bean_deserializer(
        &self,
        descriptor: &TypeDescriptor,
        config: &DeserializeConfig,
    ) -> Result<Resolution, ResolveError> {
        let _ = (descriptor, config);
        Ok(Resolution::NotHandled)
    }
}

/// Handles nothing.
impl Deserializers for () {}

/// Chains two modules; the first one to handle a descriptor wins.
impl<A: Deserializers, B: Deserializers> Deserializers for (A, B) {
    fn find_collection_deserializer(
        &self,
        descriptor: &TypeDescriptor,
        config: &DeserializeConfig,
        discriminator: Option<Arc<dyn TypeDiscriminator>>,
        element: Arc<dyn ValueDeserializer>,
    ) -> Result<Resolution, ResolveError> {
        match self.0.find_collection_deserializer(
            descriptor,
            config,
            discriminator.clone(),
            Arc::clone(&element),
        )? {
            Resolution::NotHandled => {
                self.1
                    .find_collection_deserializer(descriptor, config, discriminator, element)
            }
            handled => Ok(handled),
        }
    }

    fn find_map_deserializer(
        &self,
        descriptor: &TypeDescriptor,
        config: &DeserializeConfig,
        key: Arc<dyn ValueDeserializer>,
        discriminator: Option<Arc<dyn TypeDiscriminator>>,
        value: Arc<dyn ValueDeserializer>,
    ) -> Result<Resolution, ResolveError> {
        match self.0.find_map_deserializer(
            descriptor,
            config,
            Arc::clone(&key),
            discriminator.clone(),
            Arc::clone(&value),
        )? {
            Resolution::NotHandled => {
                self.1
                    .find_map_deserializer(descriptor, config, key, discriminator, value)
            }
            handled => Ok(handled),
        }
    }

    fn find_map_like_deserializer(
        &self,
        descriptor: &TypeDescriptor,
        config: &DeserializeConfig,
        key: Arc<dyn ValueDeserializer>,
        discriminator: Option<Arc<dyn TypeDiscriminator>>,
        value: Arc<dyn ValueDeserializer>,
    ) -> Result<Resolution, ResolveError> {
        match self.0.find_map_like_deserializer(
            descriptor,
            config,
            Arc::clone(&key),
            discriminator.clone(),
            Arc::clone(&value),
        )? {
            Resolution::NotHandled => {
                self.1
                    .find_map_like_deserializer(descriptor, config, key, discriminator, value)
            }
            handled => Ok(handled),
        }
    }

    fn find_bean_deserializer(
        &self,
        descriptor: &TypeDescriptor,
        config: &DeserializeConfig,
    ) -> Result<Resolution, ResolveError> {
        match self.0.find_bean_deserializer(descriptor, config)? {
            Resolution::NotHandled => self.1.find_bean_deserializer(descriptor, config),
            handled => Ok(handled),
        }
    }
}

// -----------------------------------------------------------------------------
// ContainerDeserializers

/// The container resolvers of this crate as a [`Deserializers`] module.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerDeserializers;

impl Deserializers for ContainerDeserializers {
    #[inline]
    fn find_collection_deserializer(
        &self,
        descriptor: &TypeDescriptor,
        config: &DeserializeConfig,
        discriminator: Option<Arc<dyn TypeDiscriminator>>,
        element: Arc<dyn ValueDeserializer>,
    ) -> Result<Resolution, ResolveError> {
        resolve_collection(descriptor, config, discriminator, element)
    }

    #[inline]
    fn find_map_deserializer(
        &self,
        descriptor: &TypeDescriptor,
        config: &DeserializeConfig,
        key: Arc<dyn ValueDeserializer>,
        discriminator: Option<Arc<dyn TypeDiscriminator>>,
        value: Arc<dyn ValueDeserializer>,
    ) -> Result<Resolution, ResolveError> {
        resolve_map(descriptor, config, key, discriminator, value)
    }

    #[inline]
    fn find_map_like_deserializer(
        &self,
        descriptor: &TypeDescriptor,
        config: &DeserializeConfig,
        key: Arc<dyn ValueDeserializer>,
        discriminator: Option<Arc<dyn TypeDiscriminator>>,
        value: Arc<dyn ValueDeserializer>,
    ) -> Result<Resolution, ResolveError> {
        resolve_map_like(descriptor, config, key, discriminator, value)
    }

    #[inline]
    fn find_bean_deserializer(
        &self,
        descriptor: &TypeDescriptor,
        config: &DeserializeConfig,
    ) -> Result<Resolution, ResolveError> {
        resolve_scalar(descriptor, config)
    }
}

// -----------------------------------------------------------------------------
// dispatch

/// Tries the sequence, map, map-like and single-value resolvers of
/// `deserializers` in that order and returns the first strategy.
///
/// Missing content or key deserializers in `children` fall back to the
/// config's untyped deserializer.
///
/// # Examples
///
/// ```
/// use vc_collect_de::DeserializeConfig;
/// use vc_collect_de::family::Family;
/// use vc_collect_de::info::{TypeDescriptor, classes};
/// use vc_collect_de::resolve::{ContainerDeserializers, dispatch};
/// use vc_collect_de::strategy::Children;
///
/// let config = DeserializeConfig::new();
/// let ty = TypeDescriptor::collection(
///     &classes::IMMUTABLE_SORTED_SET,
///     TypeDescriptor::of(&classes::I64),
/// );
/// let children = Children {
///     content: config.find_scalar(&TypeDescriptor::of(&classes::I64)),
///     ..Children::default()
/// };
///
/// let resolution = dispatch(&ContainerDeserializers, &ty, &children, &config).unwrap();
/// assert_eq!(resolution.strategy().unwrap().family(), Family::ImmutableOrderedSet);
///
/// let plain = TypeDescriptor::collection(&classes::VEC, TypeDescriptor::of(&classes::I64));
/// assert!(!dispatch(&ContainerDeserializers, &plain, &children, &config).unwrap().is_handled());
/// ```
pub fn dispatch<D: Deserializers + ?Sized>(
    deserializers: &D,
    descriptor: &TypeDescriptor,
    children: &Children,
    config: &DeserializeConfig,
) -> Result<Resolution, ResolveError> {
    let content = children.content.clone().unwrap_or_else(|| config.untyped());
    let discriminator = children.content_discriminator.clone();

    let resolution = deserializers.find_collection_deserializer(
        descriptor,
        config,
        discriminator.clone(),
        Arc::clone(&content),
    )?;
    if resolution.is_handled() {
        return Ok(resolution);
    }

    let key = children.key.clone().unwrap_or_else(|| config.untyped());
    let resolution = deserializers.find_map_deserializer(
        descriptor,
        config,
        Arc::clone(&key),
        discriminator.clone(),
        Arc::clone(&content),
    )?;
    if resolution.is_handled() {
        return Ok(resolution);
    }

    let resolution =
        deserializers.find_map_like_deserializer(descriptor, config, key, discriminator, content)?;
    if resolution.is_handled() {
        return Ok(resolution);
    }

    deserializers.find_bean_deserializer(descriptor, config)
}

#[cfg(test)]
mod tests {
    use super::{ContainerDeserializers, Deserializers, Resolution, dispatch};
    use crate::de::{IntDeserializer, StringDeserializer, ValueDeserializer};
    use crate::family::{
        Family, ImmutableMapKind, ListMultimapKind, MultisetKind, SetMultimapKind, WrapperKind,
    };
    use crate::info::{RawClass, TypeDescriptor, classes};
    use crate::strategy::{Children, RangeStrategy, Strategy};
    use crate::{DeserializeConfig, ResolveError};
    use alloc::sync::Arc;

    fn children() -> Children {
        Children {
            key: Some(Arc::new(StringDeserializer)),
            content: Some(Arc::new(IntDeserializer)),
            content_discriminator: None,
        }
    }

    fn family_of(descriptor: &TypeDescriptor) -> Option<Family> {
        dispatch(
            &ContainerDeserializers,
            descriptor,
            &children(),
            &DeserializeConfig::new(),
        )
        .unwrap()
        .into_strategy()
        .map(|strategy| strategy.family())
    }

    fn assert_resolves(descriptor: &TypeDescriptor, family: Family) {
        let config = DeserializeConfig::new();
        let strategy = dispatch(&ContainerDeserializers, descriptor, &children(), &config)
            .unwrap()
            .into_strategy()
            .unwrap_or_else(|| panic!("`{descriptor}` should resolve"));
        assert!(family.is_implemented(), "{descriptor}");
        assert_eq!(strategy.family(), family, "{descriptor}");
        assert_eq!(strategy.policy(), family.policy(), "{descriptor}");
        if !strategy.is_shared() {
            assert_eq!(strategy.descriptor(), Some(descriptor), "{descriptor}");
        }
    }

    #[test]
    fn resolved_policies_match_the_family_table() {
        use Family as F;
        use ImmutableMapKind as M;
        use ListMultimapKind as L;
        use MultisetKind as B;
        use SetMultimapKind as S;
        use WrapperKind as W;

        let string = || TypeDescriptor::of(&classes::STRING);
        let int = || TypeDescriptor::of(&classes::I64);

        let sequences = [
            (&classes::IMMUTABLE_LIST, F::ImmutableSequence),
            (&classes::IMMUTABLE_SORTED_SET, F::ImmutableOrderedSet),
            (&classes::IMMUTABLE_SET, F::ImmutableSet),
            (&classes::IMMUTABLE_MULTISET, F::ImmutableMultiset),
            (&classes::HASH_MULTISET, F::Multiset(B::Hashed)),
            (
                &classes::LINKED_HASH_MULTISET,
                F::Multiset(B::InsertionOrdered),
            ),
            (&classes::TREE_MULTISET, F::Multiset(B::Sorted)),
        ];
        for (raw, family) in sequences {
            assert_resolves(&TypeDescriptor::collection(raw, int()), family);
        }

        let maps = [
            (&classes::IMMUTABLE_MAP, F::ImmutableMap(M::Plain)),
            (&classes::IMMUTABLE_SORTED_MAP, F::ImmutableMap(M::Sorted)),
            (
                &classes::IMMUTABLE_BI_MAP,
                F::ImmutableMap(M::Bidirectional),
            ),
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
        for (raw, family) in maps {
            assert_resolves(&TypeDescriptor::map(raw, string(), int()), family);
        }

        let optional = TypeDescriptor::with_params(&classes::OPTIONAL, [string()]);
        let range = TypeDescriptor::of(&classes::RANGE);
        let host = TypeDescriptor::of(&classes::HOST_AND_PORT);
        assert_resolves(&optional, F::ScalarWrapper(W::Optional));
        assert_resolves(&range, F::ScalarWrapper(W::Range));
        assert_resolves(&host, F::ScalarWrapper(W::HostAndPort));
    }

    #[test]
    fn first_module_wins() {
        #[derive(Debug)]
        struct Ranges;

        impl Deserializers for Ranges {
            fn find_collection_deserializer(
                &self,
                descriptor: &TypeDescriptor,
                _: &DeserializeConfig,
                _: Option<Arc<dyn crate::de::TypeDiscriminator>>,
                _: Arc<dyn ValueDeserializer>,
            ) -> Result<Resolution, ResolveError> {
                Ok(Resolution::Resolved(Strategy::owned(RangeStrategy::new(descriptor.clone()))))
            }
        }

        let list = TypeDescriptor::collection(
            &classes::IMMUTABLE_LIST,
            TypeDescriptor::of(&classes::I64),
        );
        let config = DeserializeConfig::new();

        let chained = (Ranges, ContainerDeserializers);
        let resolution = dispatch(&chained, &list, &children(), &config).unwrap();
        assert_eq!(
            resolution.strategy().map(|s| s.family()),
            Some(Family::ScalarWrapper(WrapperKind::Range))
        );

        let chained = ((), ContainerDeserializers);
        let resolution = dispatch(&chained, &list, &children(), &config).unwrap();
        assert_eq!(
            resolution.strategy().map(|s| s.family()),
            Some(Family::ImmutableSequence)
        );

        let unchained = dispatch(&(), &list, &children(), &config).unwrap();
        assert!(!unchained.is_handled());
    }

    #[test]
    fn unrelated_shapes_are_not_handled() {
        static POINT: RawClass = RawClass::new("app::Point", &[]);
        assert_eq!(family_of(&TypeDescriptor::of(&POINT)), None);
        assert_eq!(family_of(&TypeDescriptor::of(&classes::I64)), None);
    }

    #[test]
    fn idempotent() {
        let config = DeserializeConfig::new();
        let children = children();
        let descriptor = TypeDescriptor::map(
            &classes::HASH_MULTIMAP,
            TypeDescriptor::of(&classes::STRING),
            TypeDescriptor::of(&classes::I64),
        );

        let first = dispatch(&ContainerDeserializers, &descriptor, &children, &config).unwrap();
        let second = dispatch(&ContainerDeserializers, &descriptor, &children, &config).unwrap();
        let first = first.into_strategy().unwrap();
        let second = second.into_strategy().unwrap();
        assert_eq!(first.family(), second.family());
        assert_eq!(first.policy(), second.policy());
        assert_eq!(first.children(), second.children());
        assert_eq!(first.children(), children);
    }

    #[cfg(feature = "std")]
    #[test]
    fn concurrent_resolution() {
        let config = DeserializeConfig::new();
        let children = children();
        let descriptor = TypeDescriptor::collection(
            &classes::TREE_MULTISET,
            TypeDescriptor::of(&classes::I64),
        );

        std::thread::scope(|scope| {
            let handles: alloc::vec::Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        dispatch(&ContainerDeserializers, &descriptor, &children, &config)
                            .unwrap()
                            .into_strategy()
                            .map(|strategy| strategy.family())
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(
                    handle.join().unwrap(),
                    Some(Family::Multiset(crate::family::MultisetKind::Sorted))
                );
            }
        });
    }
}
