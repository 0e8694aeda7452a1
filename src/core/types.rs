//! Pixel buffers that flow through the filters.
//!
//! The buffer is an enum over the two shapes a transform can produce:
//! - Closed set: every transform yields either color or grayscale output
//! - The channel mode is a property of the variant, so it cannot drift
//!   from the data it describes

use image::{DynamicImage, GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a renderer must interpret a buffer's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelMode {
    /// Three channels per pixel: red, green, blue.
    #[serde(rename = "RGB")]
    Rgb,
    /// One intensity channel per pixel.
    #[serde(rename = "GRAY")]
    Gray,
}

impl ChannelMode {
    /// Label understood by render sinks.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelMode::Rgb => "RGB",
            ChannelMode::Gray => "GRAY",
        }
    }

    /// Number of samples per pixel.
    pub fn channels(&self) -> u8 {
        match self {
            ChannelMode::Rgb => 3,
            ChannelMode::Gray => 1,
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An 8-bit image of height H and width W with one or three channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelBuffer {
    /// (H, W, 3) color buffer.
    Rgb(RgbImage),
    /// (H, W) intensity buffer.
    Gray(GrayImage),
}

impl PixelBuffer {
    /// Channel mode derived from the buffer's shape.
    pub fn channel_mode(&self) -> ChannelMode {
        match self {
            PixelBuffer::Rgb(_) => ChannelMode::Rgb,
            PixelBuffer::Gray(_) => ChannelMode::Gray,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        match self {
            PixelBuffer::Rgb(img) => img.width(),
            PixelBuffer::Gray(img) => img.width(),
        }
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        match self {
            PixelBuffer::Rgb(img) => img.height(),
            PixelBuffer::Gray(img) => img.height(),
        }
    }

    /// Shape as `(height, width, channels)`.
    pub fn shape(&self) -> (u32, u32, u8) {
        (self.height(), self.width(), self.channel_mode().channels())
    }

    /// Raw samples in row-major, channel-interleaved order.
    pub fn as_raw(&self) -> &[u8] {
        match self {
            PixelBuffer::Rgb(img) => img.as_raw(),
            PixelBuffer::Gray(img) => img.as_raw(),
        }
    }

    /// Borrow the color image, if this is a color buffer.
    pub fn as_rgb(&self) -> Option<&RgbImage> {
        match self {
            PixelBuffer::Rgb(img) => Some(img),
            PixelBuffer::Gray(_) => None,
        }
    }

    /// Borrow the grayscale image, if this is a grayscale buffer.
    pub fn as_gray(&self) -> Option<&GrayImage> {
        match self {
            PixelBuffer::Gray(img) => Some(img),
            PixelBuffer::Rgb(_) => None,
        }
    }

    /// Convert into an `image` crate dynamic image for encoding.
    pub fn into_dynamic(self) -> DynamicImage {
        match self {
            PixelBuffer::Rgb(img) => DynamicImage::ImageRgb8(img),
            PixelBuffer::Gray(img) => DynamicImage::ImageLuma8(img),
        }
    }
}

impl From<RgbImage> for PixelBuffer {
    fn from(img: RgbImage) -> Self {
        PixelBuffer::Rgb(img)
    }
}

impl From<GrayImage> for PixelBuffer {
    fn from(img: GrayImage) -> Self {
        PixelBuffer::Gray(img)
    }
}
