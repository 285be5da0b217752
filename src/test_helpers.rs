//! Shared test utilities for the contrib-wall test suite.
//!
//! Builders for contributors and API payloads, plus in-memory image fixtures
//! in every format the avatar stage has to cope with.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let config = test_config("https://api.test");
//! let body = contributors_json(&logins(&["alice", "bob"]));
//! let avatar = png_bytes(40, 30);
//! ```

use crate::config::AppConfig;
use crate::types::Contributor;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use std::io::Cursor;

// =========================================================================
// Contributors and API payloads
// =========================================================================

/// Avatar URL the fixtures use for `login`.
pub fn avatar_url(login: &str) -> String {
    format!("https://avatars.test/u/{login}")
}

/// A contributor with predictable profile and avatar URLs.
pub fn contributor(login: &str) -> Contributor {
    Contributor {
        login: login.to_string(),
        html_url: format!("https://github.com/{login}"),
        avatar_url: avatar_url(login),
    }
}

pub fn logins(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A contributors API page as GitHub would send it, extra fields included.
pub fn contributors_json(logins: &[String]) -> Vec<u8> {
    let page: Vec<serde_json::Value> = logins
        .iter()
        .enumerate()
        .map(|(i, login)| {
            let c = contributor(login);
            serde_json::json!({
                "login": c.login,
                "id": i + 1,
                "html_url": c.html_url,
                "avatar_url": c.avatar_url,
                "type": "User",
                "contributions": 1000 - i,
            })
        })
        .collect();
    serde_json::to_vec(&page).unwrap()
}

/// The `acme/widgets` config used throughout the tests, 64px avatars.
pub fn test_config(api_url: &str) -> AppConfig {
    AppConfig {
        oauth: "t".to_string(),
        org: "acme".to_string(),
        repo: "widgets".to_string(),
        excluded: Vec::new(),
        avatar_size: 64,
        api_url: api_url.to_string(),
        template: None,
    }
}

// =========================================================================
// Image fixtures
// =========================================================================

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Left half opaque red, right half fully transparent.
fn half_transparent(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([255, 255, 255, 0])
        }
    })
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(gradient_rgb(width, height)),
        ImageFormat::Jpeg,
    )
}

/// RGBA PNG whose right half is transparent.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(half_transparent(width, height)),
        ImageFormat::Png,
    )
}

pub fn gif_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(half_transparent(width, height)),
        ImageFormat::Gif,
    )
}

pub fn webp_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(gradient_rgb(width, height)),
        ImageFormat::WebP,
    )
}

/// Bytes carrying a BMP signature; recognised by sniffing but not decodable
/// with the compiled-in codecs.
pub fn bmp_signature_bytes() -> Vec<u8> {
    let mut bytes = b"BM".to_vec();
    bytes.extend_from_slice(&[0u8; 64]);
    bytes
}
