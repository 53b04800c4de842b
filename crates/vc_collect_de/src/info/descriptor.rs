use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};

use super::{RawClass, classes};
use crate::de::{TypeDiscriminator, ValueDeserializer};

// -----------------------------------------------------------------------------
// TypeDescriptor

/// A raw class together with its resolved type parameters.
///
/// Sequences, multisets and optionals carry one parameter (the content type);
/// maps and multimaps carry two (key, then content). A descriptor may also
/// carry an attached value deserializer and polymorphic type discriminator,
/// which take precedence over anything a resolver would look up itself.
///
/// Equality and hashing consider only the class and parameters, never the
/// attached handlers.
///
/// # Examples
///
/// ```
/// use vc_collect_de::info::{TypeDescriptor, classes};
///
/// let ty = TypeDescriptor::map(
///     &classes::HASH_MULTIMAP,
///     TypeDescriptor::of(&classes::STRING),
///     TypeDescriptor::of(&classes::I64),
/// );
///
/// assert_eq!(ty.to_string(), "HashMultimap<String, i64>");
/// assert_eq!(ty.key_type().unwrap().raw_class(), &classes::STRING);
/// assert_eq!(ty.content_type().unwrap().raw_class(), &classes::I64);
/// ```
#[derive(Clone)]
pub struct TypeDescriptor {
    raw: &'static RawClass,
    params: Arc<[TypeDescriptor]>,
    value_handler: Option<Arc<dyn ValueDeserializer>>,
    type_handler: Option<Arc<dyn TypeDiscriminator>>,
}

impl TypeDescriptor {
    /// A descriptor without type parameters.
    #[inline]
    pub fn of(raw: &'static RawClass) -> Self {
        Self::with_params(raw, [])
    }

    /// A descriptor for [`classes::UNKNOWN`].
    #[inline]
    pub fn unknown() -> Self {
        Self::of(&classes::UNKNOWN)
    }

    pub fn with_params(
        raw: &'static RawClass,
        params: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Self {
        Self {
            raw,
            params: params.into_iter().collect(),
            value_handler: None,
            type_handler: None,
        }
    }

    /// A one-parameter descriptor, e.g. `ImmutableList<T>`.
    #[inline]
    pub fn collection(raw: &'static RawClass, content: TypeDescriptor) -> Self {
        Self::with_params(raw, [content])
    }

    /// A two-parameter descriptor, e.g. `ImmutableMap<K, V>`.
    #[inline]
    pub fn map(raw: &'static RawClass, key: TypeDescriptor, content: TypeDescriptor) -> Self {
        Self::with_params(raw, [key, content])
    }

    #[inline]
    pub fn raw_class(&self) -> &'static RawClass {
        self.raw
    }

    #[inline]
    pub fn type_params(&self) -> &[TypeDescriptor] {
        &self.params
    }

    #[inline]
    pub fn type_param(&self, index: usize) -> Option<&TypeDescriptor> {
        self.params.get(index)
    }

    /// The key slot: the first parameter of a two-parameter descriptor.
    #[inline]
    pub fn key_type(&self) -> Option<&TypeDescriptor> {
        match &*self.params {
            [key, _] => Some(key),
            _ => None,
        }
    }

    /// The content slot: the last parameter.
    #[inline]
    pub fn content_type(&self) -> Option<&TypeDescriptor> {
        self.params.last()
    }

    #[inline]
    pub fn is_assignable_to(&self, class: &RawClass) -> bool {
        self.raw.is_assignable_to(class)
    }

    #[inline]
    pub fn value_handler(&self) -> Option<&Arc<dyn ValueDeserializer>> {
        self.value_handler.as_ref()
    }

    #[inline]
    pub fn type_handler(&self) -> Option<&Arc<dyn TypeDiscriminator>> {
        self.type_handler.as_ref()
    }

    /// `true` if a value or type handler is attached.
    #[inline]
    pub fn has_handlers(&self) -> bool {
        self.value_handler.is_some() || self.type_handler.is_some()
    }

    /// Attaches the deserializer to use for values of this type.
    #[inline]
    pub fn with_value_handler(mut self, handler: Arc<dyn ValueDeserializer>) -> Self {
        self.value_handler = Some(handler);
        self
    }

    /// Attaches the discriminator to use for polymorphic values of this type.
    #[inline]
    pub fn with_type_handler(mut self, handler: Arc<dyn TypeDiscriminator>) -> Self {
        self.type_handler = Some(handler);
        self
    }

    /// Replaces the type parameters, keeping class and handlers.
    pub fn with_type_params(mut self, params: Vec<TypeDescriptor>) -> Self {
        self.params = params.into();
        self
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.params == other.params
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
        self.params.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.raw, f)?;
        if let [first, rest @ ..] = &*self.params {
            write!(f, "<{first}")?;
            for param in rest {
                write!(f, ", {param}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("raw", &self.raw)
            .field("params", &self.params)
            .field("value_handler", &self.value_handler.is_some())
            .field("type_handler", &self.type_handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::TypeDescriptor;
    use crate::de::IntDeserializer;
    use crate::info::classes;
    use alloc::string::ToString;
    use alloc::sync::Arc;

    #[test]
    fn slots_by_arity() {
        let list =
            TypeDescriptor::collection(&classes::IMMUTABLE_LIST, TypeDescriptor::of(&classes::I64));
        assert!(list.key_type().is_none());
        assert_eq!(
            list.content_type(),
            Some(&TypeDescriptor::of(&classes::I64))
        );

        let bare = TypeDescriptor::of(&classes::OPTIONAL);
        assert!(bare.content_type().is_none());
        assert_eq!(bare.to_string(), "Option");
    }

    #[test]
    fn equality_ignores_handlers() {
        let plain = TypeDescriptor::of(&classes::I64);
        let handled = plain.clone().with_value_handler(Arc::new(IntDeserializer));
        assert!(handled.has_handlers());
        assert_eq!(plain, handled);
    }

    #[test]
    fn nested_display() {
        let ty = TypeDescriptor::collection(
            &classes::OPTIONAL,
            TypeDescriptor::map(
                &classes::IMMUTABLE_SORTED_MAP,
                TypeDescriptor::of(&classes::STRING),
                TypeDescriptor::collection(&classes::IMMUTABLE_LIST, TypeDescriptor::unknown()),
            ),
        );
        assert_eq!(
            ty.to_string(),
            "Option<ImmutableSortedMap<String, ImmutableList<unknown>>>"
        );
    }
}
