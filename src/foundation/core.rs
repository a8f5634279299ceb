use serde::{Deserialize, Serialize};

use crate::foundation::error::{PostergenError, PostergenResult};

/// In-memory poster canvas: straight-alpha RGBA8, row-major.
pub type Canvas = image::RgbaImage;

/// Axis-aligned rectangle in background-image pixel coordinates.
///
/// `width`/`height` are the exact dimensions the source photo is stretched to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels, always > 0.
    pub width: u32,
    /// Height in pixels, always > 0.
    pub height: u32,
}

impl PlacementRect {
    /// Build a rectangle, rejecting empty sizes.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> PostergenResult<Self> {
        if width == 0 || height == 0 {
            return Err(PostergenError::validation(format!(
                "placement rect must have positive size, got {width}x{height}"
            )));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Exclusive right edge.
    pub fn right(self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from all four channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
