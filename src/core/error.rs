//! Error types for Filterlab.
//!
//! Uses thiserror for structured errors with context. Errors are designed to:
//! - Stay local to a single filter-apply invocation
//! - Carry actionable information (which parameter, what value, why)
//! - Convert into the top-level [`FilterlabError`] with `?`

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for Filterlab.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum FilterlabError {
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by the registry and the dispatcher.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterError {
    #[error("Unknown filter '{name}'")]
    UnknownFilter { name: String },

    /// `value` is `None` when the parameter was not supplied at all.
    #[error("Invalid value {} for parameter '{parameter}': {reason}", shown(.value))]
    InvalidParameter {
        parameter: String,
        value: Option<i64>,
        reason: String,
    },
}

fn shown(value: &Option<i64>) -> String {
    value.map_or_else(|| "<none>".to_string(), |v| v.to_string())
}

/// Errors from decoding an uploaded image.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Uploaded file is empty")]
    Empty,

    #[error("Unsupported image format: {0} (expected PNG or JPEG)")]
    UnsupportedFormat(String),

    #[error("Upload of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("Could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from encoding or writing a filter result.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Could not encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// Error Utilities
// ============================================================================

impl FilterError {
    /// A required parameter that was not supplied.
    pub fn missing(parameter: &str) -> Self {
        FilterError::InvalidParameter {
            parameter: parameter.to_string(),
            value: None,
            reason: "missing".to_string(),
        }
    }

    /// Get a suggestion for fixing this error, suitable for showing to the user.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            FilterError::UnknownFilter { .. } => {
                Some("Run 'filterlab list' to see the available filters".to_string())
            }
            FilterError::InvalidParameter { parameter, value: None, .. } => {
                Some(format!("Provide a value for '{}'", parameter))
            }
            FilterError::InvalidParameter { parameter, .. } => Some(format!(
                "Choose an odd '{}' between {} and {}",
                parameter,
                crate::core::kernel::KernelSize::MIN,
                crate::core::kernel::KernelSize::MAX
            )),
        }
    }

    /// Whether the error was caused by user-supplied parameters rather than
    /// an inconsistency between the selection surface and the registry.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, FilterError::UnknownFilter { .. })
    }
}

impl IntakeError {
    /// Whether the bytes were rejected before any decoding was attempted.
    pub fn is_rejected_upfront(&self) -> bool {
        matches!(
            self,
            IntakeError::Empty | IntakeError::UnsupportedFormat(_) | IntakeError::TooLarge { .. }
        )
    }
}

/// Result type alias for Filterlab operations.
pub type FilterlabResult<T> = Result<T, FilterlabError>;

/// Result type alias for registry and dispatch operations.
pub type FilterResult<T> = Result<T, FilterError>;
