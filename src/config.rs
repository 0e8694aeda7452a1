//! Configuration loaded from a TOML file.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration.
//!
//! ```toml
//! [kernel]
//! default = 5
//!
//! [intake]
//! max_bytes = 52428800
//!
//! [render]
//! embed_preview = true
//! ```

use crate::core::error::ConfigError;
use crate::core::kernel::{KernelControl, KernelSize};
use crate::io::intake::DEFAULT_MAX_BYTES;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterlabConfig {
    /// Kernel-size selection.
    pub kernel: KernelConfig,
    /// Upload handling.
    pub intake: IntakeConfig,
    /// Result rendering.
    pub render: RenderConfig,
}

/// Kernel-size selection settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelConfig {
    /// Kernel size preselected for filters that take one.
    pub default: KernelSize,
}

/// Upload handling settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntakeConfig {
    /// Largest accepted upload in bytes.
    pub max_bytes: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// Result rendering settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Embed the encoded image as a data URL in previews.
    pub embed_preview: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { embed_preview: true }
    }
}

impl FilterlabConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file. `None` means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                let config = Self::from_toml(&text)?;
                log::debug!("loaded config from {}", path.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.intake.max_bytes == 0 {
            return Err(ConfigError::Invalid(
                "intake.max_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Kernel-size control for a selection surface.
    pub fn kernel_control(&self) -> KernelControl {
        KernelControl::with_default(self.kernel.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FilterlabConfig::from_toml("").unwrap();
        assert_eq!(config, FilterlabConfig::default());
        assert_eq!(config.kernel.default.get(), 5);
        assert_eq!(config.intake.max_bytes, DEFAULT_MAX_BYTES);
        assert!(config.render.embed_preview);
    }

    #[test]
    fn test_partial_override() {
        let config = FilterlabConfig::from_toml("[kernel]\ndefault = 9\n").unwrap();
        assert_eq!(config.kernel.default.get(), 9);
        assert_eq!(config.kernel_control().default.get(), 9);
        assert_eq!(config.kernel_control().max, 15);
        assert!(config.render.embed_preview);
    }

    #[test]
    fn test_rejects_even_default_kernel() {
        let err = FilterlabConfig::from_toml("[kernel]\ndefault = 6\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(FilterlabConfig::from_toml("[render]\ntheme = \"sunset\"\n").is_err());
    }

    #[test]
    fn test_rejects_zero_upload_limit() {
        let err = FilterlabConfig::from_toml("[intake]\nmax_bytes = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nembed_preview = false").unwrap();
        let config = FilterlabConfig::load(Some(file.path())).unwrap();
        assert!(!config.render.embed_preview);

        assert_eq!(FilterlabConfig::load(None).unwrap(), FilterlabConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FilterlabConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
