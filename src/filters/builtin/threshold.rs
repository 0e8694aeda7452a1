//! Threshold filters: adaptive Gaussian thresholding

use crate::core::filter::{Category, FilterDescriptor, FilterMetadata, Transform};
use crate::core::types::PixelBuffer;
use crate::filters::plane::{gaussian_kernel, saturate, separable, to_grayscale, Border, Plane};
use image::{GrayImage, Luma, RgbImage};

/// Side length of the neighborhood used for the local mean.
pub const ADAPTIVE_BLOCK_SIZE: usize = 11;
/// Constant subtracted from the local mean.
pub const ADAPTIVE_OFFSET: i32 = 2;

/// "Adaptive Thresholding": grayscale output.
pub fn adaptive_thresholding() -> FilterDescriptor {
    FilterDescriptor::new(
        FilterMetadata::builder("adaptive_thresholding", "Adaptive Thresholding")
            .category(Category::Threshold)
            .description("Binarize against an 11x11 Gaussian-weighted local mean minus 2")
            .grayscale_output()
            .build(),
        Transform::Plain(adaptive_threshold),
    )
}

/// Binarize the grayscale image: a pixel becomes 255 when it exceeds its
/// rounded local Gaussian mean minus [`ADAPTIVE_OFFSET`], otherwise 0.
pub fn adaptive_threshold(image: &RgbImage) -> PixelBuffer {
    let gray = to_grayscale(image);
    let weights = gaussian_kernel(ADAPTIVE_BLOCK_SIZE);
    let mean = separable(&Plane::from_gray(&gray), &weights, &weights, Border::Replicate);

    let binary = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let local = saturate(mean.get(x as usize, y as usize)) as i32;
        let value = gray.get_pixel(x, y)[0] as i32;
        Luma([if value > local - ADAPTIVE_OFFSET { 255 } else { 0 }])
    });
    PixelBuffer::Gray(binary)
}
