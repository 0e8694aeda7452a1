//! Filter dispatcher.
//!
//! Selects a filter by name, checks the kernel-size contract, runs the
//! transform once and classifies the result's channel mode.

use crate::core::error::{FilterError, FilterResult};
use crate::core::filter::Transform;
use crate::core::kernel::{KernelSize, KERNEL_SIZE_PARAM};
use crate::core::types::{ChannelMode, PixelBuffer};
use crate::filters::registry::FilterRegistry;
use image::RgbImage;
use serde::Serialize;
use std::time::Instant;

/// Result of one filter application.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutput {
    /// The new buffer. The input is never modified.
    pub buffer: PixelBuffer,
    /// Channel mode derived from `buffer`.
    pub mode: ChannelMode,
    /// Display name of the filter that ran.
    pub filter: String,
    /// Kernel size passed to the transform, if it took one.
    pub kernel_size: Option<KernelSize>,
    /// Execution statistics.
    pub stats: DispatchStats,
}

/// Timing and shape information about a single dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    /// Time spent inside the transform, in milliseconds.
    pub duration_ms: u64,
    /// Input width and height.
    pub dimensions: (u32, u32),
    /// Whether a supplied kernel size was ignored.
    pub kernel_ignored: bool,
}

/// Applies registered filters to images.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    registry: &'a FilterRegistry,
}

impl Dispatcher<'static> {
    /// Dispatcher over the built-in registry.
    pub fn new() -> Self {
        Self {
            registry: FilterRegistry::global(),
        }
    }
}

impl Default for Dispatcher<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Dispatcher<'a> {
    /// Dispatcher over a specific registry.
    pub fn with_registry(registry: &'a FilterRegistry) -> Self {
        Self { registry }
    }

    /// The registry filters are looked up in.
    pub fn registry(&self) -> &'a FilterRegistry {
        self.registry
    }

    /// Apply the filter called `name` to `image`.
    ///
    /// Filters that accept a kernel size require `kernel_size` to be present,
    /// odd and within `[3, 15]`. For other filters any supplied value is
    /// ignored.
    pub fn apply(
        &self,
        name: &str,
        image: &RgbImage,
        kernel_size: Option<i64>,
    ) -> FilterResult<FilterOutput> {
        let descriptor = self.registry.lookup(name)?;
        let filter = descriptor.name().to_string();
        log::debug!("dispatching '{}' on {}x{} image", filter, image.width(), image.height());

        let start = Instant::now();
        let (buffer, kernel, kernel_ignored) = match descriptor.transform {
            Transform::Sized(transform) => {
                let raw = kernel_size.ok_or_else(|| FilterError::missing(KERNEL_SIZE_PARAM))?;
                let kernel = KernelSize::new(raw)?;
                (transform(image, kernel), Some(kernel), false)
            }
            Transform::Plain(transform) => {
                if let Some(raw) = kernel_size {
                    log::warn!("'{}' takes no kernel size; ignoring {}", filter, raw);
                }
                (transform(image), None, kernel_size.is_some())
            }
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        // Several transforms collapse color to grayscale, so the mode is
        // always read off the result.
        let mode = buffer.channel_mode();
        log::info!("applied '{}' in {}ms ({} output)", filter, duration_ms, mode);

        Ok(FilterOutput {
            buffer,
            mode,
            filter,
            kernel_size: kernel,
            stats: DispatchStats {
                duration_ms,
                dimensions: (image.width(), image.height()),
                kernel_ignored,
            },
        })
    }
}

/// Apply a built-in filter; shorthand for `Dispatcher::new().apply(..)`.
pub fn apply(name: &str, image: &RgbImage, kernel_size: Option<i64>) -> FilterResult<FilterOutput> {
    Dispatcher::new().apply(name, image, kernel_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{FilterDescriptor, FilterMetadata};
    use image::Rgb;
    use proptest::prelude::*;

    const GRAY_FILTERS: [&str; 3] = [
        "Edge Detection (Sobel)",
        "Histogram Equalization",
        "Adaptive Thresholding",
    ];

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 13 % 256) as u8, (y * 29 % 256) as u8, ((x + y) * 7 % 256) as u8])
        })
    }

    #[test]
    fn test_every_filter_preserves_dimensions_and_input() {
        let image = gradient(17, 11);
        let original = image.clone();
        for name in FilterRegistry::global().names() {
            let output = apply(name, &image, Some(5)).unwrap();
            assert_eq!(output.buffer.width(), 17, "{name}");
            assert_eq!(output.buffer.height(), 11, "{name}");
            assert_eq!(output.mode, output.buffer.channel_mode(), "{name}");
            let expected = if GRAY_FILTERS.contains(&name) { ChannelMode::Gray } else { ChannelMode::Rgb };
            assert_eq!(output.mode, expected, "{name}");
        }
        assert_eq!(image, original);
    }

    #[test]
    fn test_rejects_even_kernel() {
        let image = gradient(8, 8);
        let err = apply("Smoothing", &image, Some(4)).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter { value: Some(4), .. }));
    }

    #[test]
    fn test_accepts_largest_kernel() {
        let image = gradient(8, 8);
        let output = apply("Median Blur", &image, Some(15)).unwrap();
        assert_eq!(output.kernel_size.map(u32::from), Some(15));
        assert_eq!(output.mode, ChannelMode::Rgb);
    }

    #[test]
    fn test_rejects_out_of_range_kernel() {
        let image = gradient(8, 8);
        for bad in [1, 17, -3] {
            assert!(matches!(
                apply("Bilateral Filter", &image, Some(bad)),
                Err(FilterError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_missing_kernel_for_sized_filter() {
        let image = gradient(8, 8);
        for name in ["Smoothing", "Median Blur", "Bilateral Filter", "Edge Detection (Sobel)"] {
            let err = apply(name, &image, None).unwrap_err();
            assert!(
                matches!(&err, FilterError::InvalidParameter { parameter, value: None, .. } if parameter == KERNEL_SIZE_PARAM),
                "{name}: {err:?}"
            );
        }
    }

    #[test]
    fn test_plain_filter_ignores_kernel() {
        let image = gradient(9, 6);
        for supplied in [Some(4), Some(99), None] {
            let output = apply("Sharpening", &image, supplied).unwrap();
            assert_eq!(output.mode, ChannelMode::Rgb);
            assert_eq!(output.buffer.shape(), (6, 9, 3));
            assert_eq!(output.kernel_size, None);
            assert_eq!(output.stats.kernel_ignored, supplied.is_some());
        }
    }

    #[test]
    fn test_unknown_filter() {
        let image = gradient(4, 4);
        assert!(matches!(
            apply("Vignette", &image, None),
            Err(FilterError::UnknownFilter { .. })
        ));
    }

    #[test]
    fn test_log_of_black_is_zero() {
        let image = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
        let output = apply("Log Transformation", &image, None).unwrap();
        assert_eq!(output.buffer, PixelBuffer::Rgb(RgbImage::new(2, 2)));
    }

    #[test]
    fn test_custom_registry() {
        fn invert(image: &RgbImage) -> PixelBuffer {
            let mut out = image.clone();
            out.iter_mut().for_each(|v| *v = 255 - *v);
            PixelBuffer::Rgb(out)
        }

        let mut registry = FilterRegistry::new();
        registry.register(FilterDescriptor::new(
            FilterMetadata::builder("invert", "Invert").build(),
            Transform::Plain(invert),
        ));
        let dispatcher = Dispatcher::with_registry(&registry);
        let output = dispatcher.apply("invert", &RgbImage::new(1, 1), None).unwrap();
        assert_eq!(output.filter, "Invert");
        assert_eq!(output.buffer.as_raw(), &[255, 255, 255]);
        assert!(dispatcher.apply("Smoothing", &RgbImage::new(1, 1), Some(3)).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_shape_and_mode(
            width in 1u32..12,
            height in 1u32..12,
            seed in any::<u8>(),
            filter_index in 0usize..10,
            kernel_index in 0usize..7,
        ) {
            let image = RgbImage::from_fn(width, height, |x, y| {
                let v = seed.wrapping_add((x * 31 + y * 17) as u8);
                Rgb([v, v.wrapping_mul(5), v ^ 0x5a])
            });
            let name = FilterRegistry::global().names()[filter_index];
            let kernel = 3 + 2 * kernel_index as i64;
            let output = apply(name, &image, Some(kernel)).unwrap();

            prop_assert_eq!(output.buffer.width(), width);
            prop_assert_eq!(output.buffer.height(), height);
            let expected_channels = if GRAY_FILTERS.contains(&name) { 1 } else { 3 };
            prop_assert_eq!(output.mode.channels(), expected_channels);
        }

        #[test]
        fn prop_flat_image_stretch_is_identity(value in any::<u8>(), size in 1u32..10) {
            let image = RgbImage::from_pixel(size, size, Rgb([value, value, value]));
            let output = apply("Contrast Stretching", &image, None).unwrap();
            prop_assert_eq!(output.buffer, PixelBuffer::Rgb(image));
        }
    }
}
