//! Tone filters: contrast stretching, log transformation, histogram equalization
//!
//! All three are point operations, so each one builds a 256-entry lookup
//! table and maps samples through it.

use crate::core::filter::{Category, FilterDescriptor, FilterMetadata, Transform};
use crate::core::types::PixelBuffer;
use crate::filters::plane::to_grayscale;
use image::{GrayImage, RgbImage};

/// Lower percentile mapped to 0 by contrast stretching.
pub const STRETCH_LOW_PERCENTILE: f64 = 5.0;
/// Upper percentile mapped to 255 by contrast stretching.
pub const STRETCH_HIGH_PERCENTILE: f64 = 95.0;

/// "Contrast Stretching": percentile-based linear rescale.
pub fn contrast_stretching() -> FilterDescriptor {
    FilterDescriptor::new(
        FilterMetadata::builder("contrast_stretching", "Contrast Stretching")
            .category(Category::Adjust)
            .description("Map the 5th/95th intensity percentiles to 0/255")
            .build(),
        Transform::Plain(contrast_stretch),
    )
}

/// "Log Transformation": logarithmic tone curve.
pub fn log_transformation() -> FilterDescriptor {
    FilterDescriptor::new(
        FilterMetadata::builder("log_transformation", "Log Transformation")
            .category(Category::Adjust)
            .description("Expand dark tones with log(1 + v) scaled to 0-255")
            .build(),
        Transform::Plain(log_transform),
    )
}

/// "Histogram Equalization": grayscale output.
pub fn histogram_equalization() -> FilterDescriptor {
    FilterDescriptor::new(
        FilterMetadata::builder("histogram_equalization", "Histogram Equalization")
            .category(Category::Adjust)
            .description("Flatten the grayscale intensity histogram")
            .grayscale_output()
            .build(),
        Transform::Plain(equalize_histogram),
    )
}

fn histogram(samples: &[u8]) -> [usize; 256] {
    let mut bins = [0usize; 256];
    for &v in samples {
        bins[v as usize] += 1;
    }
    bins
}

/// Value at sorted position `index`.
fn nth_sample(bins: &[usize; 256], index: usize) -> f64 {
    let mut seen = 0;
    for (value, &count) in bins.iter().enumerate() {
        seen += count;
        if seen > index {
            return value as f64;
        }
    }
    255.0
}

/// Percentile with linear interpolation between the closest ranks.
fn percentile(bins: &[usize; 256], total: usize, p: f64) -> f64 {
    let rank = p / 100.0 * (total - 1) as f64;
    let lower = rank.floor() as usize;
    let fraction = rank - lower as f64;
    let low = nth_sample(bins, lower);
    let high = nth_sample(bins, (lower + 1).min(total - 1));
    low + fraction * (high - low)
}

fn map_rgb(image: &RgbImage, lut: &[u8; 256]) -> RgbImage {
    let mut output = image.clone();
    for sample in output.iter_mut() {
        *sample = lut[*sample as usize];
    }
    output
}

/// Linearly rescale so the 5th percentile (over all pixels and channels)
/// maps to 0 and the 95th to 255. A flat percentile range returns the
/// input unchanged.
pub fn contrast_stretch(image: &RgbImage) -> PixelBuffer {
    let samples = image.as_raw();
    if samples.is_empty() {
        return PixelBuffer::Rgb(image.clone());
    }
    let bins = histogram(samples);
    let low = percentile(&bins, samples.len(), STRETCH_LOW_PERCENTILE);
    let high = percentile(&bins, samples.len(), STRETCH_HIGH_PERCENTILE);

    if high <= low {
        log::debug!("contrast stretch range is flat at {low}, leaving image unchanged");
        return PixelBuffer::Rgb(image.clone());
    }

    let scale = 255.0 / (high - low);
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        *out = ((v as f64 - low) * scale).clamp(0.0, 255.0) as u8;
    }
    PixelBuffer::Rgb(map_rgb(image, &lut))
}

/// `ln(1 + v) * 255 / ln(256)` per sample, truncated like the stretch.
pub fn log_transform(image: &RgbImage) -> PixelBuffer {
    // ln(256) = 8 ln(2); log2 keeps the 255 endpoint exact.
    let scale = 255.0 / 8.0;
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        *out = ((1.0 + v as f64).log2() * scale).clamp(0.0, 255.0) as u8;
    }
    PixelBuffer::Rgb(map_rgb(image, &lut))
}

/// Histogram-equalize the grayscale version of `image`.
pub fn equalize_histogram(image: &RgbImage) -> PixelBuffer {
    PixelBuffer::Gray(equalize_gray(&to_grayscale(image)))
}

/// CDF remap: `round((cdf(v) - cdf_min) / (N - cdf_min) * 255)`.
///
/// A single-valued image has nothing to redistribute and is returned as is.
pub(crate) fn equalize_gray(gray: &GrayImage) -> GrayImage {
    let bins = histogram(gray.as_raw());
    let total = gray.as_raw().len();
    let Some(first) = bins.iter().position(|&count| count > 0) else {
        return gray.clone();
    };
    let cdf_min = bins[first];
    if cdf_min == total {
        return gray.clone();
    }

    let scale = 255.0 / (total - cdf_min) as f64;
    let mut lut = [0u8; 256];
    let mut cumulative = 0;
    for (v, out) in lut.iter_mut().enumerate().skip(first + 1) {
        cumulative += bins[v];
        *out = (cumulative as f64 * scale).round().clamp(0.0, 255.0) as u8;
    }

    let mut output = gray.clone();
    for sample in output.iter_mut() {
        *sample = lut[*sample as usize];
    }
    output
}
