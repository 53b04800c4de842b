use alloc::string::ToString;
use alloc::sync::Arc;

use super::{Resolution, resolved, unimplemented_family};
use crate::de::{TypeDiscriminator, ValueDeserializer};
use crate::family::{Family, MultisetKind};
use crate::info::{TypeDescriptor, classes};
use crate::strategy::{SequenceStrategy, SequenceTarget, Strategy};
use crate::taxonomy;
use crate::{DeserializeConfig, ResolveError};

/// Resolves immutable sequences, sets and multisets.
///
/// An ordered set additionally requires an orderable element class; a
/// missing element parameter counts as `unknown`, which is not orderable.
///
/// # Errors
///
/// [`ResolveError::UnorderableElement`] for an ordered set of a class that is
/// not orderable.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_collect_de::{DeserializeConfig, ResolveError};
/// use vc_collect_de::de::FloatDeserializer;
/// use vc_collect_de::info::{TypeDescriptor, classes};
/// use vc_collect_de::resolve::resolve_collection;
///
/// let floats = TypeDescriptor::of(&classes::F64);
/// let ty = TypeDescriptor::collection(&classes::IMMUTABLE_SORTED_SET, floats);
/// let config = DeserializeConfig::new();
/// let err = resolve_collection(&ty, &config, None, Arc::new(FloatDeserializer)).unwrap_err();
/// assert!(matches!(err, ResolveError::UnorderableElement { element: "f64", .. }));
/// ```
pub fn resolve_collection(
    descriptor: &TypeDescriptor,
    config: &DeserializeConfig,
    discriminator: Option<Arc<dyn TypeDiscriminator>>,
    element: Arc<dyn ValueDeserializer>,
) -> Result<Resolution, ResolveError> {
    let Some(family) = taxonomy::classify_collection(descriptor.raw_class()) else {
        return Ok(Resolution::NotHandled);
    };

    let target = match family {
        Family::ImmutableSequence => SequenceTarget::List,
        Family::ImmutableOrderedSet => {
            let element_class = descriptor
                .content_type()
                .map_or(&classes::UNKNOWN, TypeDescriptor::raw_class);
            if !element_class.is_orderable() {
                return Err(ResolveError::UnorderableElement {
                    container: descriptor.to_string(),
                    element: element_class.path(),
                });
            }
            SequenceTarget::SortedSet
        }
        Family::ImmutableSet => SequenceTarget::Set,
        Family::ImmutableMultiset => SequenceTarget::ImmutableMultiset,
        Family::Multiset(MultisetKind::Hashed) => SequenceTarget::HashMultiset,
        Family::Multiset(MultisetKind::InsertionOrdered) => SequenceTarget::LinkedHashMultiset,
        Family::Multiset(MultisetKind::Sorted) => SequenceTarget::TreeMultiset,
        Family::Multiset(MultisetKind::EnumKeyed) => {
            return Ok(unimplemented_family(descriptor, family));
        }
        Family::Map
        | Family::ImmutableMap(_)
        | Family::BidirectionalMap(_)
        | Family::ListMultimap(_)
        | Family::SetMultimap(_)
        | Family::Table
        | Family::ScalarWrapper(_) => return Ok(Resolution::NotHandled),
    };

    let strategy = SequenceStrategy::new(
        descriptor.clone(),
        target,
        element,
        discriminator,
        config.features(),
    );
    Ok(resolved(descriptor, Strategy::owned(strategy)))
}
