//! Core types for the Filterlab filter pipeline.
//!
//! This module contains the foundational types shared by the registry,
//! the filters and the dispatcher:
//! - Pixel buffers and channel modes
//! - The validated kernel-size parameter
//! - Filter descriptors and transform signatures
//! - Error types

pub mod error;
pub mod filter;
pub mod kernel;
pub mod types;

// Re-export commonly used types
pub use error::{ConfigError, FilterError, FilterlabError, IntakeError, RenderError};
pub use filter::{Category, FilterDescriptor, FilterMetadata, Transform};
pub use kernel::{KernelControl, KernelSize};
pub use types::{ChannelMode, PixelBuffer};
