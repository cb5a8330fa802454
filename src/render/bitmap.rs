use crate::foundation::core::Rgba8;
use crate::foundation::error::{SlideError, SlideResult};

/// A raster image as premultiplied RGBA8 pixels, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes (`width * height * 4`).
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Wrap premultiplied bytes, checking that the length matches the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> SlideResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(SlideError::validation(format!(
                "bitmap byte length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A bitmap filled with one color.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        let px = color.premultiplied();
        let count = (width as usize).saturating_mul(height as usize);
        Self {
            width,
            height,
            data: px.repeat(count),
        }
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// `true` when every pixel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 255)
    }

    /// `true` when the bitmap has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Straight-alpha copy of the pixels, as expected by image encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> SlideResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SlideError::validation("bitmap size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/bitmap.rs"]
mod tests;
