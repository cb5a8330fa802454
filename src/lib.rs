//! slidecanvas turns presentation documents into correctly sized, rotated and scaled bitmaps.
//!
//! The crate is the headless core of a slide viewer. It owns what happens between "a document
//! was converted into slide content" and "pixels landed on the host's canvas", and delegates the
//! two platform-specific steps to pluggable collaborators.
//!
//! # Pipeline overview
//!
//! 1. **Load**: [`SlideStore::load`] asks a [`ConversionCollaborator`] for slide content, measures
//!    each slide's real content height and installs an immutable [`Presentation`].
//! 2. **Rasterize**: on a cache miss, [`Renderer::render`] asks a [`Rasterizer`] for a 1:1 bitmap
//!    of the slide over an opaque background, sized with a safety margin.
//! 3. **Compose**: the bitmap is scaled and rotated onto a fresh canvas ([`compose`]), cached in a
//!    bounded FIFO [`RenderCache`], and presented on the destination [`Surface`].
//! 4. **Fallback**: any failure after argument validation draws an opaque error surface instead,
//!    and is reported through [`RenderOutcome::Fallback`].
//!
//! The [`SvgDeckConverter`] and [`SvgRasterizer`] collaborators make the crate usable on its own
//! with decks of SVG slides; hosts embedding a layout engine provide their own.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Premultiplied RGBA8** end-to-end: bitmaps and surfaces hold premultiplied pixels.
//! - **One writer per surface**: `render` takes the renderer and the surface by `&mut`.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;
mod render;
mod store;
mod svg;

pub use foundation::config::{RendererOpts, StoreOpts, ViewerConfig};
pub use foundation::core::{
    Affine, DEFAULT_DPI, DEFAULT_SLIDE_HEIGHT, DEFAULT_SLIDE_WIDTH, MAX_CANVAS_DIM,
    MIN_SLIDE_HEIGHT, Point, Rect, Rgba8, Rotation, Size, Vec2,
};
pub use foundation::error::{SlideError, SlideResult};
pub use render::bitmap::Bitmap;
pub use render::cache::{RenderCache, RenderKey};
pub use render::composite::compose;
pub use render::fallback::RENDER_ERROR_LINES;
pub use render::geometry::{
    destination_size, draw_transform, fallback_size, fit_scale, raster_extent, to_px,
};
pub use render::rasterize::{RasterRequest, Rasterizer};
pub use render::renderer::{RenderOutcome, RenderStats, Renderer, Thumbnail};
pub use render::surface::{Canvas, Surface};
pub use store::convert::{
    ConversionCollaborator, ConvertedDocument, ConvertedSlide, DocumentSource, ElementBox,
    MarkupHook,
};
pub use store::measure::{MeasureParams, measure_slide};
pub use store::presentation::{Presentation, SlideContent};
pub use store::slide_store::SlideStore;
pub use svg::deck::{DeckManifest, SvgDeckConverter, load_deck};
pub use svg::fonts::FontSet;
pub use svg::raster::{SvgRasterizer, rasterize_markup};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;
