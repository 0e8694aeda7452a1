//! Kernel-size parameter and the control that selects it.
//!
//! A kernel size is only meaningful for filters that declare they accept
//! one. It is validated once, at construction, so transforms can rely on
//! receiving an odd size in `[3, 15]`.

use crate::core::error::{FilterError, FilterResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the kernel-size parameter in errors and UI descriptions.
pub const KERNEL_SIZE_PARAM: &str = "kernel_size";

/// Validated kernel size: an odd integer in `[3, 15]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct KernelSize(u32);

impl KernelSize {
    /// Smallest accepted kernel size.
    pub const MIN: u32 = 3;
    /// Largest accepted kernel size.
    pub const MAX: u32 = 15;
    /// Default used by the selection control.
    pub const DEFAULT: KernelSize = KernelSize(5);

    /// Validate a raw value. Even and out-of-range values are rejected,
    /// never clamped.
    pub fn new(value: i64) -> FilterResult<Self> {
        let reason = if value < Self::MIN as i64 {
            Some(format!("below minimum {}", Self::MIN))
        } else if value > Self::MAX as i64 {
            Some(format!("above maximum {}", Self::MAX))
        } else if value % 2 == 0 {
            Some("even; kernel size must be odd".to_string())
        } else {
            None
        };

        match reason {
            Some(reason) => Err(FilterError::InvalidParameter {
                parameter: KERNEL_SIZE_PARAM.to_string(),
                value: Some(value),
                reason,
            }),
            None => Ok(Self(value as u32)),
        }
    }

    /// Side length of the kernel window.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Distance from the window center to its edge.
    pub fn radius(self) -> u32 {
        self.0 / 2
    }

    /// Every valid kernel size in ascending order.
    pub fn all() -> impl Iterator<Item = KernelSize> {
        (Self::MIN..=Self::MAX).step_by(2).map(KernelSize)
    }
}

impl Default for KernelSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for KernelSize {
    type Error = FilterError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<KernelSize> for u32 {
    fn from(size: KernelSize) -> Self {
        size.0
    }
}

impl fmt::Display for KernelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

/// Description of the slider a selection surface shows for filters that
/// accept a kernel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelControl {
    /// Lowest selectable value.
    pub min: u32,
    /// Highest selectable value.
    pub max: u32,
    /// Slider step; keeps the value odd.
    pub step: u32,
    /// Initially selected value.
    pub default: KernelSize,
}

impl KernelControl {
    /// Control with a custom initial value.
    pub fn with_default(default: KernelSize) -> Self {
        Self {
            default,
            ..Self::default()
        }
    }

    /// Values the control can produce.
    pub fn options(&self) -> Vec<u32> {
        (self.min..=self.max).step_by(self.step as usize).collect()
    }
}

impl Default for KernelControl {
    fn default() -> Self {
        Self {
            min: KernelSize::MIN,
            max: KernelSize::MAX,
            step: 2,
            default: KernelSize::DEFAULT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_odd_in_range() {
        for value in [3, 5, 7, 9, 11, 13, 15] {
            assert_eq!(KernelSize::new(value).unwrap().get(), value as u32);
        }
    }

    #[test]
    fn test_rejects_even() {
        let err = KernelSize::new(4).unwrap_err();
        match err {
            FilterError::InvalidParameter { parameter, value, reason } => {
                assert_eq!(parameter, KERNEL_SIZE_PARAM);
                assert_eq!(value, Some(4));
                assert!(reason.contains("odd"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(KernelSize::new(1).is_err());
        assert!(KernelSize::new(-3).is_err());
        assert!(KernelSize::new(17).is_err());
        assert!(KernelSize::new(0).is_err());
    }

    #[test]
    fn test_radius_and_display() {
        let k = KernelSize::new(7).unwrap();
        assert_eq!(k.radius(), 3);
        assert_eq!(k.to_string(), "7x7");
    }

    #[test]
    fn test_all_matches_control_options() {
        let sizes: Vec<u32> = KernelSize::all().map(u32::from).collect();
        assert_eq!(sizes, KernelControl::default().options());
        assert_eq!(sizes.first(), Some(&3));
        assert_eq!(sizes.last(), Some(&15));
    }

    #[test]
    fn test_serde_validates() {
        let ok: KernelSize = serde_json::from_str("9").unwrap();
        assert_eq!(ok.get(), 9);
        assert!(serde_json::from_str::<KernelSize>("8").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "9");
    }
}
