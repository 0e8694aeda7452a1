//! Built-in filter implementations.
//!
//! This module contains the ten filters that ship with Filterlab.

mod blur;
mod edge;
mod sharpen;
mod stylize;
mod threshold;
mod tone;

use crate::filters::registry::FilterRegistry;

/// Register all built-in filters.
///
/// Registration order is display order; the first entry is the default
/// selection.
pub fn register_all(registry: &mut FilterRegistry) {
    registry.register(blur::smoothing());
    registry.register(blur::median_blur());
    registry.register(blur::bilateral_filter());
    registry.register(sharpen::sharpening());
    registry.register(tone::contrast_stretching());
    registry.register(edge::edge_detection());
    registry.register(tone::log_transformation());
    registry.register(tone::histogram_equalization());
    registry.register(threshold::adaptive_thresholding());
    registry.register(stylize::emboss_filter());
}

// Re-export for direct access
pub use blur::{bilateral, gaussian_blur, median, BILATERAL_SIGMA_COLOR, BILATERAL_SIGMA_SPACE};
pub use edge::sobel;
pub use sharpen::{sharpen, SHARPEN_KERNEL};
pub use stylize::{emboss, EMBOSS_KERNEL, EMBOSS_OFFSET};
pub use threshold::{adaptive_threshold, ADAPTIVE_BLOCK_SIZE, ADAPTIVE_OFFSET};
pub use tone::{
    contrast_stretch, equalize_histogram, log_transform, STRETCH_HIGH_PERCENTILE,
    STRETCH_LOW_PERCENTILE,
};
