#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod config;
mod error;
mod value;

pub mod de;
pub mod family;
pub mod host;
pub mod info;
pub mod resolve;
pub mod strategy;
pub mod taxonomy;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use config::{DeserializeConfig, DeserializeFeatures};
pub use error::ResolveError;
pub use value::{Collection, Value};
