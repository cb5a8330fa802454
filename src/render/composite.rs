use std::sync::Arc;

use crate::foundation::core::{Affine, Rgba8, Rotation};
use crate::foundation::error::{SlideError, SlideResult};
use crate::render::bitmap::Bitmap;
use crate::render::geometry::{destination_size, draw_transform};

/// Compose a rasterized slide onto a fresh canvas at `scale` and `rotation`.
///
/// The canvas is sized by [`destination_size`], filled with `background`, and the raster is
/// drawn through [`draw_transform`].
pub fn compose(
    raster: &Bitmap,
    scale: f64,
    rotation: Rotation,
    background: Rgba8,
) -> SlideResult<Bitmap> {
    let (dst_w, dst_h) = destination_size(raster.width, raster.height, scale, rotation)?;
    let w16 = to_u16(dst_w, "canvas width")?;
    let h16 = to_u16(dst_h, "canvas height")?;

    let src = bitmap_to_pixmap(raster)?;
    let image = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(src)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        background.r,
        background.g,
        background.b,
        background.a,
    ));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(dst_w),
        f64::from(dst_h),
    ));

    let transform = draw_transform(raster.width, raster.height, dst_w, dst_h, scale, rotation);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(image);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(raster.width),
        f64::from(raster.height),
    ));
    ctx.flush();

    let mut out = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut out);
    Bitmap::new(dst_w, dst_h, out.data_as_u8_slice().to_vec())
}

fn to_u16(v: u32, what: &str) -> SlideResult<u16> {
    v.try_into()
        .map_err(|_| SlideError::rasterization(format!("{what} exceeds u16: {v}")))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bitmap_to_pixmap(bitmap: &Bitmap) -> SlideResult<vello_cpu::Pixmap> {
    let w = to_u16(bitmap.width, "raster width")?;
    let h = to_u16(bitmap.height, "raster height")?;
    if bitmap.data.len() != bitmap.width as usize * bitmap.height as usize * 4 {
        return Err(SlideError::rasterization("raster byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(bitmap.width as usize * bitmap.height as usize);
    for px in bitmap.data.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
