use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::error::Result;
use crate::painting::PaintColor;

/// Integer pixel coordinate on a mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPosition {
    pub x: i32,
    pub y: i32,
}

impl PixelPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Mutable paint mask of a single surface.
///
/// Stamps write into a working buffer; the visible texture is only updated
/// by [`Mask::apply`], once per stamp.
#[derive(Debug, Clone)]
pub struct Mask {
    working: RgbaImage,
    texture: RgbaImage,
    revision: u64,
}

impl Mask {
    /// Clone a surface's original mask into a private RGBA buffer so edits
    /// never reach the shared source image.
    pub fn from_original(original: &RgbaImage) -> Self {
        Self {
            working: original.clone(),
            texture: original.clone(),
            revision: 0,
        }
    }

    /// Overwrite a filled circle of diameter `size` centered on `center`.
    ///
    /// Offsets run over `[-floor(size/2), ceil(size/2))` on both axes and are
    /// kept when `dx² + dy² <= (size/2)²`. Pixels outside the mask are
    /// skipped. Returns the number of pixels written.
    pub fn stamp(&mut self, center: PixelPosition, color: PaintColor, size: f32) -> usize {
        let pixel = color.to_rgba8();
        let half = size as f64 / 2.0;
        let radius_sq = half * half;
        let (cx, cy) = (center.x as i64, center.y as i64);

        // Clip the offset range to the mask so the cost is bounded by its area
        let start = -(half.floor() as i64);
        let end = half.ceil() as i64;
        let (dx_lo, dx_hi) = (start.max(-cx), end.min(self.width() as i64 - cx));
        let (dy_lo, dy_hi) = (start.max(-cy), end.min(self.height() as i64 - cy));

        let mut written = 0;
        for dx in dx_lo..dx_hi {
            for dy in dy_lo..dy_hi {
                let dist_sq = (dx as f64).powi(2) + (dy as f64).powi(2);
                if dist_sq <= radius_sq {
                    self.working.put_pixel((cx + dx) as u32, (cy + dy) as u32, pixel);
                    written += 1;
                }
            }
        }

        self.apply();
        written
    }

    /// Commit the working buffer to the visible texture
    pub fn apply(&mut self) {
        let texture: &mut [u8] = &mut self.texture;
        texture.copy_from_slice(&self.working);
        self.revision += 1;
    }

    /// Pixel of the working buffer, `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.working.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// The committed texture shown on the surface
    pub fn texture(&self) -> &RgbaImage {
        &self.texture
    }

    /// Number of times the working buffer has been committed
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn width(&self) -> u32 {
        self.working.width()
    }

    pub fn height(&self) -> u32 {
        self.working.height()
    }

    /// Export the committed texture to PNG bytes
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.texture.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

/// Decode an encoded image (PNG) into an RGBA mask source
pub fn decode_mask(bytes: &[u8]) -> Result<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}
