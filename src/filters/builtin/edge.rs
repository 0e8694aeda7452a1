//! Edge detection filters: Sobel gradient magnitude

use crate::core::filter::{Category, FilterDescriptor, FilterMetadata, Transform};
use crate::core::kernel::KernelSize;
use crate::core::types::PixelBuffer;
use crate::filters::plane::{binomial, clip_truncate, separable, to_grayscale, Border, Plane};
use image::RgbImage;

/// "Edge Detection (Sobel)": grayscale output, takes a kernel size.
pub fn edge_detection() -> FilterDescriptor {
    FilterDescriptor::new(
        FilterMetadata::builder("edge_detection", "Edge Detection (Sobel)")
            .category(Category::Edge)
            .description("Sobel gradient magnitude with a k x k aperture")
            .grayscale_output()
            .build(),
        Transform::Sized(sobel),
    )
}

/// Smoothing and first-derivative kernels for a Sobel aperture of `size`.
///
/// The smoothing half is a binomial row; the derivative half is `[-1, 0, 1]`
/// convolved with the binomial row two entries shorter.
pub(crate) fn sobel_kernels(size: usize) -> (Vec<f32>, Vec<f32>) {
    let smooth = binomial(size);
    let inner = binomial(size - 2);
    let mut derivative = vec![0.0f32; size];
    for (i, &w) in inner.iter().enumerate() {
        derivative[i] -= w;
        derivative[i + 2] += w;
    }
    (smooth, derivative)
}

/// Gradient magnitude `sqrt(gx^2 + gy^2)` of the grayscale image, clipped
/// to `[0, 255]`.
pub fn sobel(image: &RgbImage, kernel: KernelSize) -> PixelBuffer {
    let gray = Plane::from_gray(&to_grayscale(image));
    let (smooth, derivative) = sobel_kernels(kernel.get() as usize);

    let gx = separable(&gray, &derivative, &smooth, Border::Reflect101);
    let gy = separable(&gray, &smooth, &derivative, Border::Reflect101);

    let magnitude = Plane {
        width: gray.width,
        height: gray.height,
        data: gx
            .data
            .iter()
            .zip(&gy.data)
            .map(|(&x, &y)| x.hypot(y))
            .collect(),
    };
    PixelBuffer::Gray(magnitude.to_gray(clip_truncate))
}
