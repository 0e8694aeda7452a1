//! Sharpening with a fixed 3x3 kernel

use crate::core::filter::{Category, FilterDescriptor, FilterMetadata, Transform};
use crate::core::types::PixelBuffer;
use crate::filters::plane::{correlate3x3, merge_rgb, saturate, Border, Plane};
use image::RgbImage;

/// Center-weighted Laplacian sharpening kernel.
pub const SHARPEN_KERNEL: [[f32; 3]; 3] = [
    [0.0, -1.0, 0.0],
    [-1.0, 5.0, -1.0],
    [0.0, -1.0, 0.0],
];

/// "Sharpening": takes no kernel size.
pub fn sharpening() -> FilterDescriptor {
    FilterDescriptor::new(
        FilterMetadata::builder("sharpening", "Sharpening")
            .category(Category::Sharpen)
            .description("Boost local contrast with a fixed 3x3 sharpening kernel")
            .build(),
        Transform::Plain(sharpen),
    )
}

/// Correlate each channel with [`SHARPEN_KERNEL`], saturating to `[0, 255]`.
pub fn sharpen(image: &RgbImage) -> PixelBuffer {
    let planes = Plane::split_rgb(image)
        .map(|plane| correlate3x3(&plane, &SHARPEN_KERNEL, Border::Reflect101));
    PixelBuffer::Rgb(merge_rgb(&planes, saturate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_metadata() {
        let descriptor = sharpening();
        assert_eq!(descriptor.metadata.id, "sharpening");
        assert!(!descriptor.accepts_kernel_size());
    }

    #[test]
    fn test_flat_image_unchanged() {
        // Kernel weights sum to 1.
        let image = RgbImage::from_pixel(5, 5, Rgb([90, 140, 200]));
        assert_eq!(sharpen(&image), PixelBuffer::Rgb(image.clone()));
    }

    #[test]
    fn test_isolated_bright_pixel_saturates() {
        let mut image = RgbImage::from_pixel(5, 5, Rgb([100, 100, 100]));
        image.put_pixel(2, 2, Rgb([200, 200, 200]));
        let PixelBuffer::Rgb(out) = sharpen(&image) else {
            panic!("expected color output");
        };
        // 5 * 200 - 4 * 100 = 600
        assert_eq!(out.get_pixel(2, 2)[0], 255);
        // 5 * 100 - 200 - 3 * 100 = 0
        assert_eq!(out.get_pixel(2, 1)[0], 0);
        assert_eq!(out.get_pixel(0, 0)[0], 100);
    }
}
