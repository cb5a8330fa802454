use std::future::Future;
use std::pin::Pin;

use crate::foundation::error::{SlideError, SlideResult};
use crate::render::bitmap::Bitmap;
use crate::render::rasterize::{RasterRequest, Rasterizer};
use crate::store::presentation::SlideContent;
use crate::svg::fonts::FontSet;

/// Rasterizes SVG slide markup with `resvg`.
///
/// The slide is drawn at 1:1 from the top-left corner of the requested extent. Content past the
/// declared SVG size stays visible as long as it falls inside the extent. Parsing and drawing run
/// on tokio's blocking pool, so the returned future must be polled inside a runtime.
#[derive(Clone, Default)]
pub struct SvgRasterizer {
    fonts: FontSet,
}

impl SvgRasterizer {
    /// Rasterizer using system fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterizer using `fonts`.
    pub fn with_fonts(fonts: FontSet) -> Self {
        Self { fonts }
    }
}

impl Rasterizer for SvgRasterizer {
    type Raster = Pin<Box<dyn Future<Output = SlideResult<Bitmap>> + Send>>;

    fn rasterize(&mut self, slide: &SlideContent, request: RasterRequest) -> Self::Raster {
        let fonts = self.fonts.clone();
        let markup = slide.markup_handle();
        let resources_dir = slide.resources_dir().map(|p| p.to_path_buf());
        Box::pin(async move {
            tokio::task::spawn_blocking(move || {
                let opts = usvg::Options {
                    resources_dir,
                    fontdb: fonts.database(),
                    ..Default::default()
                };
                rasterize_markup(&markup, request, &opts)
            })
            .await
            .map_err(|e| SlideError::rasterization(format!("raster task failed: {e}")))?
        })
    }
}

/// Render SVG `markup` into a `request.width x request.height` premultiplied bitmap.
pub fn rasterize_markup(
    markup: &str,
    request: RasterRequest,
    opts: &usvg::Options<'_>,
) -> SlideResult<Bitmap> {
    let tree = usvg::Tree::from_str(markup, opts)
        .map_err(|e| SlideError::rasterization(format!("parse slide svg: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(request.width, request.height)
        .ok_or_else(|| {
            SlideError::rasterization(format!(
                "failed to allocate {}x{} pixmap",
                request.width, request.height
            ))
        })?;
    let bg = request.background;
    pixmap.fill(resvg::tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );
    Bitmap::new(request.width, request.height, pixmap.take())
}

#[cfg(test)]
#[path = "../../tests/unit/svg/raster.rs"]
mod tests;
