use crate::foundation::error::{SlideError, SlideResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Standard presentation width in logical units (16:9 at 96 DPI).
pub const DEFAULT_SLIDE_WIDTH: f64 = 1280.0;
/// Standard presentation height in logical units.
pub const DEFAULT_SLIDE_HEIGHT: f64 = 720.0;
/// Floor applied to every measured slide height.
pub const MIN_SLIDE_HEIGHT: f64 = 720.0;
/// Resolution reported alongside rendered thumbnails.
pub const DEFAULT_DPI: u32 = 96;
/// Largest raster or canvas dimension the renderer will allocate.
pub const MAX_CANVAS_DIM: u32 = 16_384;

/// Quarter-turn rotation applied when composing a slide onto a canvas.
///
/// Rotations are clockwise in the y-down canvas coordinate space.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Rotation {
    /// No rotation.
    #[default]
    Deg0,
    /// Quarter turn clockwise.
    Deg90,
    /// Half turn.
    Deg180,
    /// Three quarter turns clockwise.
    Deg270,
}

impl Rotation {
    /// Parse a rotation from degrees. Only the four quarter-turn values are accepted.
    pub fn from_degrees(degrees: i32) -> SlideResult<Self> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(SlideError::InvalidRotation(other)),
        }
    }

    /// Rotation in degrees.
    pub fn degrees(self) -> i32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Rotation in radians.
    pub fn radians(self) -> f64 {
        f64::from(self.degrees()).to_radians()
    }

    /// `true` for quarter turns, where the canvas width and height trade places.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
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
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `true` when the color fully covers what is below it.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Premultiplied RGBA8 bytes.
    pub fn premultiplied(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { ((u16::from(c) * a + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }

    /// `#rrggbb` form, used when emitting SVG.
    pub fn to_hex_rgb(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a `[0, 1]` opacity.
    pub fn opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
