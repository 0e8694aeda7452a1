//! Image intake and rendering adapters.
//!
//! The filters themselves only see decoded RGB buffers. These adapters turn
//! uploaded bytes into such buffers and turn filter output back into
//! encoded images for display.

pub mod intake;
pub mod render;

pub use intake::{decode, decode_limited, has_accepted_extension, load};
pub use render::{data_url, encode_png, preview, save, RenderedPreview};
