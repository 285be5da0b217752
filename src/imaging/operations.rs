//! Avatar image operations: sniff, decode, square-resize, JPEG encode.
//!
//! The content type is sniffed from the bytes, never trusted from headers.
//! Decoding yields a [`DecodedAvatar`], which is either an image or an
//! explicit [`DecodedAvatar::UnsupportedFormat`]; [`process_avatar`] turns the
//! latter into [`ImagingError::UnsupportedFormat`] instead of resizing nothing.

use super::params::{AvatarParams, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, RgbImage, RgbaImage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("Unsupported avatar format: {content_type}")]
    UnsupportedFormat { content_type: String },
    #[error("Failed to decode {content_type} avatar: {message}")]
    Decode {
        content_type: String,
        message: String,
    },
    #[error("JPEG encode failed: {0}")]
    Encode(String),
}

/// Outcome of decoding downloaded avatar bytes.
#[derive(Debug)]
pub enum DecodedAvatar {
    Decoded {
        image: DynamicImage,
        /// Sniffed source type, e.g. `image/png`.
        content_type: String,
    },
    /// The bytes sniffed as something we don't decode; carries the content type.
    UnsupportedFormat(String),
}

/// Guess a MIME type from the leading bytes.
///
/// Image signatures map to their `image/*` type; anything else is reported
/// as `text/html`, `text/plain` or `application/octet-stream` so error
/// messages say what actually came back (often an HTML error page).
pub fn sniff_content_type(bytes: &[u8]) -> String {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type().to_string();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) if text.trim_start().starts_with('<') => "text/html; charset=utf-8".to_string(),
        Ok(_) => "text/plain; charset=utf-8".to_string(),
        Err(_) => "application/octet-stream".to_string(),
    }
}

/// Decoder for a sniffed content type, if we have one compiled in.
fn decodable_format(content_type: &str) -> Option<ImageFormat> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
        "image/png" => Some(ImageFormat::Png),
        "image/gif" => Some(ImageFormat::Gif),
        "image/webp" => Some(ImageFormat::WebP),
        _ => None,
    }
}

/// Sniff and decode avatar bytes.
///
/// Returns `Err` only when the bytes claim a supported format but are corrupt.
pub fn decode_avatar(bytes: &[u8]) -> Result<DecodedAvatar, ImagingError> {
    let content_type = sniff_content_type(bytes);
    let Some(format) = decodable_format(&content_type) else {
        return Ok(DecodedAvatar::UnsupportedFormat(content_type));
    };
    match image::load_from_memory_with_format(bytes, format) {
        Ok(image) => Ok(DecodedAvatar::Decoded {
            image,
            content_type,
        }),
        Err(e) => Err(ImagingError::Decode {
            content_type,
            message: e.to_string(),
        }),
    }
}

/// Scale `img` to exactly `size × size` and flatten it onto opaque black.
///
/// Bilinear (triangle) filtering over the whole canvas, no aspect-ratio
/// preservation; transparent pixels blend "over" the black background.
pub fn resize_square(img: &DynamicImage, size: u32) -> RgbImage {
    let scaled = imageops::resize(&img.to_rgba8(), size, size, FilterType::Triangle);
    let mut canvas = RgbaImage::from_pixel(size, size, image::Rgba([0, 0, 0, 255]));
    imageops::overlay(&mut canvas, &scaled, 0, 0);
    DynamicImage::ImageRgba8(canvas).to_rgb8()
}

/// Encode an RGB image as baseline JPEG.
pub fn encode_jpeg(img: &RgbImage, quality: Quality) -> Result<Vec<u8>, ImagingError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.value())
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| ImagingError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Full avatar transform: downloaded bytes in, square JPEG bytes out.
///
/// Returns the JPEG and the sniffed source content type.
pub fn process_avatar(
    bytes: &[u8],
    params: &AvatarParams,
) -> Result<(Vec<u8>, String), ImagingError> {
    match decode_avatar(bytes)? {
        DecodedAvatar::Decoded {
            image,
            content_type,
        } => {
            let square = resize_square(&image, params.size);
            Ok((encode_jpeg(&square, params.quality)?, content_type))
        }
        DecodedAvatar::UnsupportedFormat(content_type) => {
            Err(ImagingError::UnsupportedFormat { content_type })
        }
    }
}
