use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// A descriptor that can never be deserialized.
///
/// Raised while resolving a strategy, before any input is read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("cannot handle `{container}` with elements that are not orderable (`{element}`)")]
    UnorderableElement {
        container: String,
        element: &'static str,
    },

    #[error("no deserializer found for `{0}`")]
    NoDeserializer(String),
}
