//! Stylize filters: emboss

use crate::core::filter::{Category, FilterDescriptor, FilterMetadata, Transform};
use crate::core::types::PixelBuffer;
use crate::filters::plane::{correlate3x3, merge_rgb, saturate, Border, Plane};
use image::RgbImage;

/// Directional relief kernel, lit from the bottom right.
pub const EMBOSS_KERNEL: [[f32; 3]; 3] = [
    [-2.0, -1.0, 0.0],
    [-1.0, 1.0, 1.0],
    [0.0, 1.0, 2.0],
];

/// Offset added to the kernel response so flat areas land on mid-gray.
pub const EMBOSS_OFFSET: f32 = 128.0;

/// "Emboss": takes no kernel size.
pub fn emboss_filter() -> FilterDescriptor {
    FilterDescriptor::new(
        FilterMetadata::builder("emboss", "Emboss")
            .category(Category::Stylize)
            .description("Relief effect: 3x3 emboss kernel offset by 128")
            .build(),
        Transform::Plain(emboss),
    )
}

/// Correlate each channel with [`EMBOSS_KERNEL`], add [`EMBOSS_OFFSET`] and
/// saturate. The offset is applied before clipping.
pub fn emboss(image: &RgbImage) -> PixelBuffer {
    let planes = Plane::split_rgb(image)
        .map(|plane| correlate3x3(&plane, &EMBOSS_KERNEL, Border::Reflect101));
    PixelBuffer::Rgb(merge_rgb(&planes, |v| saturate(v + EMBOSS_OFFSET)))
}
