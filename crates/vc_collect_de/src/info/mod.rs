//! Runtime type identity: raw classes and generic type descriptors.
//!
//! A [`RawClass`] is a static node in a subtype graph; a [`TypeDescriptor`]
//! pairs one with resolved type parameters and optional attached handlers.
//! The well-known classes recognised by the resolvers live in [`classes`].

mod descriptor;
mod raw_class;

pub mod classes;

pub use descriptor::TypeDescriptor;
pub use raw_class::RawClass;
