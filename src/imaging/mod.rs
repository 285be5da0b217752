//! Avatar image processing. Pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Sniff** | `image::guess_format` on the leading bytes |
//! | **Decode** (JPEG, PNG, GIF, WebP) | `image::load_from_memory_with_format` |
//! | **Resize** | `imageops::resize` with `Triangle` (bilinear) + `imageops::overlay` |
//! | **Encode → JPEG** | `image::codecs::jpeg::JpegEncoder`, quality 90 |
//!
//! The module is split into:
//! - **Parameters**: what to produce ([`AvatarParams`], [`Quality`])
//! - **Operations**: the byte-to-byte transform built from the steps above

pub mod operations;
mod params;

pub use operations::{
    DecodedAvatar, ImagingError, decode_avatar, encode_jpeg, process_avatar, resize_square,
    sniff_content_type,
};
pub use params::{AvatarParams, Quality};
