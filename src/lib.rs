//! # Filterlab - Classical Image Filter Playground
//!
//! Filterlab applies one of ten classical image filters to an uploaded
//! image for interactive preview.
//!
//! ## Features
//!
//! - **Fixed Registry**: Ten named filters in a stable display order
//! - **Typed Parameters**: Kernel sizes are validated once (odd, 3 to 15)
//! - **Arity-aware Dispatch**: Filters that take no kernel size never see one
//! - **Channel Mode Tracking**: Every result says whether it is RGB or GRAY
//! - **Preview Worker**: Optional background thread where the newest request wins
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use filterlab::prelude::*;
//!
//! let image = filterlab::io::load("photo.jpg", filterlab::io::intake::DEFAULT_MAX_BYTES)?;
//!
//! let output = Dispatcher::new().apply("Median Blur", &image, Some(5))?;
//! assert_eq!(output.mode, ChannelMode::Rgb);
//!
//! filterlab::io::save(&output.buffer, "photo-median.png")?;
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Pixel buffers, kernel sizes, filter descriptors, errors
//! - [`filters`]: The registry and the built-in filters
//! - [`execution`]: Dispatcher and preview worker
//! - [`io`]: Upload decoding and result encoding
//! - [`config`]: TOML configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod execution;
pub mod filters;
pub mod io;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use filterlab::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{ChannelMode, PixelBuffer};
    pub use crate::core::kernel::{KernelControl, KernelSize};
    pub use crate::core::filter::{Category, FilterDescriptor, FilterMetadata, Transform};

    // Errors
    pub use crate::core::error::{
        ConfigError, FilterError, FilterResult, FilterlabError, FilterlabResult, IntakeError,
        RenderError,
    };

    // Registry
    pub use crate::filters::registry::FilterRegistry;

    // Execution
    pub use crate::execution::engine::{DispatchStats, Dispatcher, FilterOutput};
    pub use crate::execution::worker::{PreviewRequest, PreviewResult, PreviewWorker};

    // I/O
    pub use crate::io::render::RenderedPreview;

    // Configuration
    pub use crate::config::FilterlabConfig;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "filterlab");
    }

    #[test]
    fn test_upload_to_preview() {
        let mut bytes = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(RgbImage::from_fn(8, 8, |x, y| {
            if (x + y) % 2 == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        }))
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();

        let image = crate::io::decode(&bytes.into_inner()).unwrap();
        let output = Dispatcher::new()
            .apply("Edge Detection (Sobel)", &image, Some(3))
            .unwrap();
        assert_eq!(output.mode, ChannelMode::Gray);

        let preview = crate::io::preview(&output, true).unwrap();
        assert_eq!(preview.channels, ChannelMode::Gray);
        assert!(preview.data_url.unwrap().starts_with("data:image/png"));
    }

    #[test]
    fn test_errors_convert_to_top_level() {
        fn run() -> FilterlabResult<FilterOutput> {
            let image = crate::io::decode(b"nope")?;
            Ok(Dispatcher::new().apply("Smoothing", &image, Some(5))?)
        }

        assert!(matches!(run(), Err(FilterlabError::Intake(_))));
    }
}
