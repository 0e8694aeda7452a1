//! Blur filters: Gaussian smoothing, median blur, bilateral filter

use crate::core::filter::{Category, FilterDescriptor, FilterMetadata, Transform};
use crate::core::kernel::KernelSize;
use crate::core::types::PixelBuffer;
use crate::filters::plane::{gaussian_kernel, merge_rgb, saturate, separable, Border, Plane};
use image::RgbImage;
use rayon::prelude::*;

/// Spatial standard deviation of the bilateral filter.
pub const BILATERAL_SIGMA_SPACE: f32 = 75.0;
/// Color standard deviation of the bilateral filter.
pub const BILATERAL_SIGMA_COLOR: f32 = 75.0;

/// "Smoothing": isotropic Gaussian blur.
pub fn smoothing() -> FilterDescriptor {
    FilterDescriptor::new(
        FilterMetadata::builder("smoothing", "Smoothing")
            .category(Category::Blur)
            .description("Gaussian blur with a k x k kernel; sigma is derived from k")
            .build(),
        Transform::Sized(gaussian_blur),
    )
}

/// "Median Blur": per-channel neighborhood median.
pub fn median_blur() -> FilterDescriptor {
    FilterDescriptor::new(
        FilterMetadata::builder("median_blur", "Median Blur")
            .category(Category::Blur)
            .description("Replace each pixel with the median of its k x k neighborhood")
            .build(),
        Transform::Sized(median),
    )
}

/// "Bilateral Filter": edge-preserving smoothing.
pub fn bilateral_filter() -> FilterDescriptor {
    FilterDescriptor::new(
        FilterMetadata::builder("bilateral_filter", "Bilateral Filter")
            .category(Category::Blur)
            .description("Edge-preserving smoothing over a k-pixel diameter")
            .build(),
        Transform::Sized(bilateral),
    )
}

/// Gaussian blur with a `k x k` kernel.
pub fn gaussian_blur(image: &RgbImage, kernel: KernelSize) -> PixelBuffer {
    let weights = gaussian_kernel(kernel.get() as usize);
    let planes = Plane::split_rgb(image)
        .map(|plane| separable(&plane, &weights, &weights, Border::Reflect101));
    PixelBuffer::Rgb(merge_rgb(&planes, saturate))
}

/// Median of each channel over a `k x k` window.
pub fn median(image: &RgbImage, kernel: KernelSize) -> PixelBuffer {
    let radius = kernel.radius();
    PixelBuffer::Rgb(imageproc::filter::median_filter(image, radius, radius))
}

/// Bilateral filter over a disc of diameter `k`.
///
/// Each neighbor is weighted by its spatial distance and by the L1 color
/// distance to the center pixel.
pub fn bilateral(image: &RgbImage, kernel: KernelSize) -> PixelBuffer {
    let (width, height) = (image.width() as usize, image.height() as usize);
    if width == 0 || height == 0 {
        return PixelBuffer::Rgb(image.clone());
    }
    let radius = kernel.radius() as isize;

    let space_coeff = -0.5 / (BILATERAL_SIGMA_SPACE * BILATERAL_SIGMA_SPACE);
    let color_coeff = -0.5 / (BILATERAL_SIGMA_COLOR * BILATERAL_SIGMA_COLOR);

    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = dx * dx + dy * dy;
            if r2 <= radius * radius {
                offsets.push((dx, dy, (r2 as f32 * space_coeff).exp()));
            }
        }
    }

    // Indexed by |dR| + |dG| + |dB|.
    let color_weights: Vec<f32> = (0..=3 * 255)
        .map(|d: u32| ((d * d) as f32 * color_coeff).exp())
        .collect();

    let src = image.as_raw();
    let mut output = RgbImage::new(image.width(), image.height());
    output
        .par_chunks_mut(width * 3)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let center = &src[(y * width + x) * 3..][..3];
                let mut sum = [0.0f32; 3];
                let mut weight_sum = 0.0f32;

                for &(dx, dy, spatial) in &offsets {
                    let sx = Border::Reflect101.index(x as isize + dx, width);
                    let sy = Border::Reflect101.index(y as isize + dy, height);
                    let neighbor = &src[(sy * width + sx) * 3..][..3];

                    let distance: u32 = center
                        .iter()
                        .zip(neighbor)
                        .map(|(&a, &b)| (a as i32 - b as i32).unsigned_abs())
                        .sum();
                    let weight = spatial * color_weights[distance as usize];

                    for (acc, &sample) in sum.iter_mut().zip(neighbor) {
                        *acc += weight * sample as f32;
                    }
                    weight_sum += weight;
                }

                for (out, acc) in row[x * 3..][..3].iter_mut().zip(sum) {
                    *out = saturate(acc / weight_sum);
                }
            }
        });

    PixelBuffer::Rgb(output)
}
