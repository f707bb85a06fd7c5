//! Provider boundary: configuration records and capability hooks consumed by flows.
//!
//! Concrete provider adapters are thin parameterizations of the engine: a
//! [`ProviderConfig`] carrying endpoint URIs and quirks, plus an optional
//! [`ProviderHooks`] override for providers whose token responses deviate from
//! the defaults.

pub mod config;
pub mod hooks;

pub use config::*;
pub use hooks::*;
