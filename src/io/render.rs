//! Encoding filter results for display.
//!
//! The channel mode decides the encoded color type: GRAY buffers become
//! single-channel PNGs, RGB buffers three-channel PNGs. Encoding a gray
//! buffer as color (or the reverse) would scramble the samples.

use crate::core::error::RenderError;
use crate::core::kernel::KernelSize;
use crate::core::types::{ChannelMode, PixelBuffer};
use crate::execution::engine::FilterOutput;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::Serialize;
use std::path::Path;

/// Summary of a rendered result, shaped for a UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPreview {
    /// Filter that produced the image, used as the caption.
    pub filter: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// How to interpret the image's samples.
    pub channels: ChannelMode,
    /// Kernel size used, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel_size: Option<KernelSize>,
    /// Time spent filtering.
    pub duration_ms: u64,
    /// `data:image/png;base64,...` URL of the result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
}

fn color_type(mode: ChannelMode) -> ExtendedColorType {
    match mode {
        ChannelMode::Rgb => ExtendedColorType::Rgb8,
        ChannelMode::Gray => ExtendedColorType::L8,
    }
}

/// Encode a buffer as PNG.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        buffer.as_raw(),
        buffer.width(),
        buffer.height(),
        color_type(buffer.channel_mode()),
    )?;
    Ok(bytes)
}

/// Encode a buffer as a base64 PNG data URL.
pub fn data_url(buffer: &PixelBuffer) -> Result<String, RenderError> {
    let png = encode_png(buffer)?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
}

/// Write a buffer to `path`; the format follows the file extension.
pub fn save(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<(), RenderError> {
    let path = path.as_ref();
    let result = match buffer {
        PixelBuffer::Rgb(img) => img.save(path),
        PixelBuffer::Gray(img) => img.save(path),
    };
    result?;
    log::info!(
        "saved {}x{} {} image to {}",
        buffer.width(),
        buffer.height(),
        buffer.channel_mode(),
        path.display()
    );
    Ok(())
}

/// Summarize a filter output, optionally embedding the encoded image.
pub fn preview(output: &FilterOutput, embed: bool) -> Result<RenderedPreview, RenderError> {
    let data_url = if embed {
        Some(data_url(&output.buffer)?)
    } else {
        None
    };

    Ok(RenderedPreview {
        filter: output.filter.clone(),
        width: output.buffer.width(),
        height: output.buffer.height(),
        channels: output.mode,
        kernel_size: output.kernel_size,
        duration_ms: output.stats.duration_ms,
        data_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::engine::apply;
    use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_png_keeps_channel_mode() {
        let gray = PixelBuffer::Gray(GrayImage::from_fn(3, 2, |x, _| Luma([x as u8 * 100])));
        let decoded = image::load_from_memory(&encode_png(&gray).unwrap()).unwrap();
        assert!(matches!(decoded, DynamicImage::ImageLuma8(_)));
        assert_eq!(decoded.to_luma8().as_raw(), gray.as_raw());

        let rgb = PixelBuffer::Rgb(RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])));
        let decoded = image::load_from_memory(&encode_png(&rgb).unwrap()).unwrap();
        assert!(matches!(decoded, DynamicImage::ImageRgb8(_)));
        assert_eq!(decoded.to_rgb8().as_raw(), rgb.as_raw());
    }

    #[test]
    fn test_data_url_prefix() {
        let buffer = PixelBuffer::Gray(GrayImage::new(1, 1));
        assert!(data_url(&buffer).unwrap().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.png");
        let buffer = PixelBuffer::Gray(GrayImage::from_pixel(4, 4, Luma([42])));
        save(&buffer, &path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.to_luma8(), GrayImage::from_pixel(4, 4, Luma([42])));
    }

    #[test]
    fn test_preview_json() {
        let image = RgbImage::from_pixel(6, 4, Rgb([10, 200, 30]));
        let output = apply("Adaptive Thresholding", &image, Some(5)).unwrap();

        let summary = preview(&output, false).unwrap();
        assert_eq!(summary.channels, ChannelMode::Gray);
        assert_eq!((summary.width, summary.height), (6, 4));
        assert!(summary.data_url.is_none());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["channels"], "GRAY");
        assert_eq!(json["filter"], "Adaptive Thresholding");
        assert!(json.get("dataUrl").is_none());
        assert!(json.get("kernelSize").is_none());

        let embedded = preview(&output, true).unwrap();
        assert!(embedded.data_url.is_some());
    }
}
