//! Parameter types for avatar processing.
//!
//! These structs describe *what* to produce, not *how*:
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 90). Clamped on construction.
//! - [`AvatarParams`]: target square edge plus quality.

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// How every cached avatar is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarParams {
    /// Edge length of the square output, in pixels.
    pub size: u32,
    pub quality: Quality,
}

impl AvatarParams {
    /// Square avatars of `size` pixels at the default quality.
    pub fn square(size: u32) -> Self {
        Self {
            size,
            quality: Quality::default(),
        }
    }
}
