use std::future::Future;

use crate::foundation::core::Rgba8;
use crate::foundation::error::SlideResult;
use crate::render::bitmap::Bitmap;
use crate::store::presentation::SlideContent;

/// Pixel extent and background for one rasterization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterRequest {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Fill applied beneath the content.
    pub background: Rgba8,
}

/// External component rendering one slide's content to a bitmap.
///
/// Content is rendered at 1:1; scaling and rotation happen later during composition. The
/// returned future resolves exactly once with a bitmap of exactly `request.width x
/// request.height` pixels, or the failure.
pub trait Rasterizer {
    /// Pending rasterization.
    type Raster: Future<Output = SlideResult<Bitmap>>;

    /// Start rasterizing `slide`.
    fn rasterize(&mut self, slide: &SlideContent, request: RasterRequest) -> Self::Raster;
}
