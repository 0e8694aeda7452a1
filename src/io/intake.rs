//! Decoding uploaded files into RGB buffers.

use crate::core::error::IntakeError;
use image::{ImageFormat, RgbImage};
use std::path::Path;

/// Default upload size limit (50 MiB).
pub const DEFAULT_MAX_BYTES: usize = 50 * 1024 * 1024;

/// Encodings accepted for upload.
pub const ACCEPTED_FORMATS: [ImageFormat; 2] = [ImageFormat::Png, ImageFormat::Jpeg];

/// File extensions a file picker should offer.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Decode PNG or JPEG bytes into an 8-bit RGB buffer using the default
/// size limit.
pub fn decode(bytes: &[u8]) -> Result<RgbImage, IntakeError> {
    decode_limited(bytes, DEFAULT_MAX_BYTES)
}

/// Decode PNG or JPEG bytes, rejecting uploads larger than `max_bytes`.
///
/// The format is sniffed from the content, not taken from a file name.
/// Any color type (grayscale, alpha, 16-bit) is converted to 8-bit RGB.
pub fn decode_limited(bytes: &[u8], max_bytes: usize) -> Result<RgbImage, IntakeError> {
    if bytes.is_empty() {
        return Err(IntakeError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(IntakeError::TooLarge {
            size: bytes.len(),
            limit: max_bytes,
        });
    }

    let format = image::guess_format(bytes)
        .map_err(|_| IntakeError::UnsupportedFormat("unrecognized data".to_string()))?;
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(IntakeError::UnsupportedFormat(format!("{:?}", format)));
    }

    let decoded = image::load_from_memory_with_format(bytes, format)?;
    log::debug!(
        "decoded {:?} upload: {}x{} {:?}",
        format,
        decoded.width(),
        decoded.height(),
        decoded.color()
    );
    Ok(decoded.to_rgb8())
}

/// Whether `path` ends in one of [`ACCEPTED_EXTENSIONS`], ignoring case.
pub fn has_accepted_extension(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.iter().any(|accepted| ext.eq_ignore_ascii_case(accepted)))
}

/// Read and decode an image file.
pub fn load(path: impl AsRef<Path>, max_bytes: usize) -> Result<RgbImage, IntakeError> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_limited(&bytes, max_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma, Rgb};
    use std::io::Cursor;

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let original = RgbImage::from_fn(5, 3, |x, y| Rgb([x as u8 * 40, y as u8 * 80, 7]));
        let bytes = encode(DynamicImage::ImageRgb8(original.clone()), ImageFormat::Png);
        assert_eq!(decode(&bytes).unwrap(), original);
    }

    #[test]
    fn test_decode_gray_png_becomes_rgb() {
        let gray = GrayImage::from_pixel(4, 4, Luma([200]));
        let bytes = encode(DynamicImage::ImageLuma8(gray), ImageFormat::Png);
        let decoded = decode(&bytes).unwrap();
        assert!(decoded.pixels().all(|p| *p == Rgb([200, 200, 200])));
    }

    #[test]
    fn test_decode_jpeg() {
        let original = RgbImage::from_pixel(16, 16, Rgb([120, 60, 30]));
        let bytes = encode(DynamicImage::ImageRgb8(original), ImageFormat::Jpeg);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (16, 16));
    }

    #[test]
    fn test_rejects_empty_and_garbage() {
        assert!(matches!(decode(&[]), Err(IntakeError::Empty)));
        assert!(matches!(
            decode(b"definitely not an image"),
            Err(IntakeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_rejects_other_formats() {
        // BMP magic number.
        let mut bytes = b"BM".to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        assert!(matches!(decode(&bytes), Err(IntakeError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_rejects_corrupt_png() {
        let bytes = encode(DynamicImage::ImageRgb8(RgbImage::new(8, 8)), ImageFormat::Png);
        let truncated = &bytes[..bytes.len() / 2];
        assert!(matches!(decode(truncated), Err(IntakeError::Decode(_))));
    }

    #[test]
    fn test_size_limit() {
        let bytes = encode(DynamicImage::ImageRgb8(RgbImage::new(8, 8)), ImageFormat::Png);
        let err = decode_limited(&bytes, 10).unwrap_err();
        assert!(matches!(err, IntakeError::TooLarge { limit: 10, .. }));
    }

    #[test]
    fn test_accepted_extensions() {
        assert!(has_accepted_extension("photo.JPG"));
        assert!(has_accepted_extension("scan.jpeg"));
        assert!(has_accepted_extension("dir/edges.png"));
        assert!(!has_accepted_extension("logo.gif"));
        assert!(!has_accepted_extension("no_extension"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("missing.png"), DEFAULT_MAX_BYTES).unwrap_err();
        assert!(matches!(err, IntakeError::Io(_)));
    }
}
