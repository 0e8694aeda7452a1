//! Filter module.
//!
//! Contains the filter registry and built-in filter implementations.

pub mod builtin;
pub(crate) mod plane;
pub mod registry;

pub use registry::FilterRegistry;
