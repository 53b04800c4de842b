use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// A structural constraint of a container was violated while building it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CollectError {
    #[error("duplicate key `{0}` in immutable map")]
    DuplicateKey(String),

    #[error("duplicate value `{0}`: bidirectional maps require unique values")]
    DuplicateValue(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("invalid host and port `{input}`: {reason}")]
    InvalidHostAndPort { input: String, reason: &'static str },
}
