//! Render-parameter resolution: raster extents, destination canvas sizes and draw transforms.

use crate::foundation::core::{Affine, MAX_CANVAS_DIM, Rotation, Size, Vec2};
use crate::foundation::error::{SlideError, SlideResult};

/// Round a logical length to whole pixels, never below one.
pub fn to_px(v: f64) -> u32 {
    if !v.is_finite() || v <= 1.0 {
        return 1;
    }
    let r = v.round();
    if r >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        r as u32
    }
}

fn check_dims(what: &str, w: u32, h: u32) -> SlideResult<(u32, u32)> {
    // Larger buffers should be produced tile by tile, which this renderer does not do.
    if w > MAX_CANVAS_DIM || h > MAX_CANVAS_DIM {
        return Err(SlideError::rasterization(format!(
            "{what} too large: {w}x{h} (max {MAX_CANVAS_DIM}x{MAX_CANVAS_DIM})"
        )));
    }
    Ok((w, h))
}

/// Off-screen extent used to rasterize a slide.
///
/// Width is the nominal width, height the larger of the measured and nominal heights; both
/// grow by `margin` (a fraction) so floating content past the nominal edges is not clipped.
pub fn raster_extent(nominal: Size, measured_height: f64, margin: f64) -> SlideResult<(u32, u32)> {
    let grow = 1.0 + margin.max(0.0);
    let content_h = if measured_height.is_finite() {
        measured_height.max(nominal.height)
    } else {
        nominal.height
    };
    let w = to_px(nominal.width * grow);
    let h = to_px(content_h * grow);
    check_dims("raster extent", w, h)
}

/// Destination canvas size for a `src_w x src_h` raster drawn at `scale` and `rotation`.
///
/// Quarter turns swap the axes.
pub fn destination_size(
    src_w: u32,
    src_h: u32,
    scale: f64,
    rotation: Rotation,
) -> SlideResult<(u32, u32)> {
    let w = to_px(f64::from(src_w) * scale);
    let h = to_px(f64::from(src_h) * scale);
    let (w, h) = if rotation.swaps_axes() { (h, w) } else { (w, h) };
    check_dims("destination canvas", w, h)
}

/// Transform mapping raster pixel space onto the destination canvas.
///
/// Translate to the canvas center, rotate, then draw the scaled raster centered on the origin.
/// All four rotations share this one path.
pub fn draw_transform(
    src_w: u32,
    src_h: u32,
    dst_w: u32,
    dst_h: u32,
    scale: f64,
    rotation: Rotation,
) -> Affine {
    let center = Vec2::new(f64::from(dst_w) / 2.0, f64::from(dst_h) / 2.0);
    let half_src = Vec2::new(f64::from(src_w) / 2.0, f64::from(src_h) / 2.0);
    Affine::translate(center)
        * Affine::rotate(rotation.radians())
        * Affine::scale(scale)
        * Affine::translate(-half_src)
}

/// Size of the error surface: nominal size at `scale`, axes swapped for quarter turns.
///
/// Sizes past `MAX_CANVAS_DIM` are shrunk uniformly to fit, keeping the deck's aspect ratio, so
/// the surface is always drawable.
pub fn fallback_size(nominal: Size, scale: f64, rotation: Rotation) -> (u32, u32) {
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };
    let (w, h) = (nominal.width * scale, nominal.height * scale);
    let fit = (f64::from(MAX_CANVAS_DIM) / w.max(h)).min(1.0);
    let w = to_px(w * fit).min(MAX_CANVAS_DIM);
    let h = to_px(h * fit).min(MAX_CANVAS_DIM);
    if rotation.swaps_axes() { (h, w) } else { (w, h) }
}

/// Largest scale at which `content` fits inside `viewport` minus `padding` on every side.
pub fn fit_scale(viewport: Size, content: Size, padding: f64) -> f64 {
    const MIN_SCALE: f64 = 0.01;
    if !(content.width > 0.0 && content.height > 0.0) {
        return 1.0;
    }
    let avail_w = viewport.width - 2.0 * padding;
    let avail_h = viewport.height - 2.0 * padding;
    let s = (avail_w / content.width).min(avail_h / content.height);
    if s.is_finite() { s.max(MIN_SCALE) } else { MIN_SCALE }
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
