use crate::foundation::config::RendererOpts;
use crate::foundation::core::{DEFAULT_DPI, Rotation};
use crate::foundation::error::{SlideError, SlideResult};
use crate::render::bitmap::Bitmap;
use crate::render::cache::{RenderCache, RenderKey};
use crate::render::composite::compose;
use crate::render::fallback::{FallbackPainter, FallbackStyle, RENDER_ERROR_LINES};
use crate::render::geometry::{fallback_size, raster_extent};
use crate::render::rasterize::{RasterRequest, Rasterizer};
use crate::render::surface::Surface;
use crate::store::slide_store::SlideStore;
use crate::svg::fonts::FontSet;

const FALLBACK_LINE_OFFSET: f64 = 20.0;
const THUMBNAIL_FONT_PX: f64 = 12.0;

/// How a [`Renderer::render`] call ended. The destination surface is valid in every case.
#[derive(Debug)]
pub enum RenderOutcome {
    /// The slide was rasterized, composed and cached.
    Rendered {
        /// Surface width.
        width: u32,
        /// Surface height.
        height: u32,
    },
    /// A cached bitmap was presented; no rasterization happened.
    CacheHit {
        /// Surface width.
        width: u32,
        /// Surface height.
        height: u32,
    },
    /// Rendering failed; an error surface was drawn instead.
    Fallback {
        /// Surface width.
        width: u32,
        /// Surface height.
        height: u32,
        /// What went wrong.
        error: SlideError,
    },
}

impl RenderOutcome {
    /// Size the destination surface was set to.
    pub fn size(&self) -> (u32, u32) {
        match *self {
            Self::Rendered { width, height }
            | Self::CacheHit { width, height }
            | Self::Fallback { width, height, .. } => (width, height),
        }
    }

    /// The failure behind a fallback draw.
    pub fn error(&self) -> Option<&SlideError> {
        match self {
            Self::Fallback { error, .. } => Some(error),
            _ => None,
        }
    }

    /// `true` when an error surface was drawn.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Counters accumulated over a renderer's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Rasterization collaborator invocations (renders and thumbnails).
    pub rasterizations: u64,
    /// Renders served from the cache.
    pub cache_hits: u64,
    /// Renders that ended in an error surface.
    pub fallbacks: u64,
}

/// A small preview of one slide.
#[derive(Debug)]
pub struct Thumbnail {
    /// Slide index.
    pub index: usize,
    /// Thumbnail pixels.
    pub bitmap: Bitmap,
    /// Resolution tag for hosts that export thumbnails.
    pub dpi: u32,
    /// Set when the slide could not be rendered and `bitmap` is a placeholder.
    pub error: Option<SlideError>,
}

/// Draws slides from a [`SlideStore`] onto a [`Surface`] at a given scale and rotation.
///
/// Composed bitmaps are kept in a bounded FIFO [`RenderCache`] keyed by
/// `(index, scale, rotation)`. The cache is dropped whenever the store's generation changes.
/// `render` borrows the renderer and the surface mutably, so renders through one renderer are
/// serialized.
pub struct Renderer<R> {
    rasterizer: R,
    opts: RendererOpts,
    cache: RenderCache,
    generation: Option<u64>,
    fallback: FallbackPainter,
    stats: RenderStats,
}

impl<R> Renderer<R> {
    /// Renderer with default options.
    pub fn new(rasterizer: R) -> Self {
        let opts = RendererOpts::default();
        Self {
            rasterizer,
            cache: RenderCache::new(opts.cache_capacity),
            generation: None,
            fallback: FallbackPainter::new(FontSet::new(opts.load_system_fonts)),
            stats: RenderStats::default(),
            opts,
        }
    }

    /// Renderer with validated options.
    pub fn with_opts(rasterizer: R, opts: RendererOpts) -> SlideResult<Self> {
        opts.validate()?;
        Ok(Self {
            rasterizer,
            cache: RenderCache::new(opts.cache_capacity),
            generation: None,
            fallback: FallbackPainter::new(FontSet::new(opts.load_system_fonts)),
            stats: RenderStats::default(),
            opts,
        })
    }

    /// Active options.
    pub fn opts(&self) -> &RendererOpts {
        &self.opts
    }

    /// The rasterization collaborator.
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Cached renders, oldest first via [`RenderCache::keys`].
    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Counters since construction.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Drop every cached bitmap.
    pub fn invalidate(&mut self) {
        if !self.cache.is_empty() {
            tracing::debug!(entries = self.cache.len(), "render cache cleared");
        }
        self.cache.clear();
    }

    fn sync_generation(&mut self, generation: u64) {
        if self.generation != Some(generation) {
            self.invalidate();
            self.generation = Some(generation);
        }
    }

    fn error_style(&self, scale: f64) -> FallbackStyle {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        FallbackStyle {
            background: self.opts.background,
            text_color: self.opts.fallback_text_color,
            font_px: (self.opts.fallback_font_px * scale).floor().max(1.0),
            line_offset: FALLBACK_LINE_OFFSET * scale,
        }
    }
}

impl<R: Rasterizer> Renderer<R> {
    /// Draw slide `index` at `scale` and `rotation_degrees` (clockwise) onto `surface`.
    ///
    /// Returns `Err` only for invalid arguments (rotation outside `{0, 90, 180, 270}`, scale not
    /// finite and positive); nothing is drawn then. Every later failure, including an index out
    /// of range, draws an opaque error surface at the nominal size and is reported through
    /// [`RenderOutcome::Fallback`].
    #[tracing::instrument(skip(self, store, surface))]
    pub async fn render<C, S>(
        &mut self,
        store: &SlideStore<C>,
        surface: &mut S,
        index: usize,
        scale: f64,
        rotation_degrees: i32,
    ) -> SlideResult<RenderOutcome>
    where
        S: Surface + ?Sized,
    {
        let rotation = Rotation::from_degrees(rotation_degrees)?;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(SlideError::validation(format!(
                "scale must be finite and positive, got {scale}"
            )));
        }
        self.sync_generation(store.generation());

        let key = RenderKey::new(index, scale, rotation);
        if let Some(hit) = self.cache.get(&key) {
            surface.present(hit);
            let (width, height) = (hit.width, hit.height);
            self.stats.cache_hits += 1;
            tracing::trace!(width, height, "render cache hit");
            return Ok(RenderOutcome::CacheHit { width, height });
        }

        let background = self.opts.background;
        let composed = self
            .rasterize_slide(store, index)
            .await
            .and_then(|raster| compose(&raster, scale, rotation, background));

        match composed {
            Ok(bitmap) => {
                surface.present(&bitmap);
                let (width, height) = (bitmap.width, bitmap.height);
                if let Some(evicted) = self.cache.insert(key, bitmap) {
                    tracing::trace!(
                        index = evicted.index(),
                        scale = evicted.scale(),
                        "evicted oldest cached render"
                    );
                }
                tracing::debug!(width, height, "slide rendered");
                Ok(RenderOutcome::Rendered { width, height })
            }
            Err(error) => {
                let (width, height) = fallback_size(store.dimensions(), scale, rotation);
                let style = self.error_style(scale);
                let bitmap = self
                    .fallback
                    .paint(width, height, &RENDER_ERROR_LINES, style);
                surface.present(&bitmap);
                self.stats.fallbacks += 1;
                tracing::warn!(error = %error, width, height, "slide render failed; drew fallback");
                Ok(RenderOutcome::Fallback {
                    width: bitmap.width,
                    height: bitmap.height,
                    error,
                })
            }
        }
    }

    /// Thumbnails for slides `from .. from + count`, clipped to the slide count.
    ///
    /// Slides render one after another, scaled to `thumbnail_width` with their aspect ratio kept.
    /// A slide that fails gets a labelled placeholder and carries its error. The render cache
    /// is neither read nor filled.
    #[tracing::instrument(skip(self, store))]
    pub async fn thumbnails<C>(
        &mut self,
        store: &SlideStore<C>,
        from: usize,
        count: usize,
    ) -> Vec<Thumbnail> {
        let end = from.saturating_add(count).min(store.slide_count());
        let mut out = Vec::with_capacity(end.saturating_sub(from));
        for index in from..end {
            let thumb = match self.thumbnail(store, index).await {
                Ok(bitmap) => Thumbnail {
                    index,
                    bitmap,
                    dpi: DEFAULT_DPI,
                    error: None,
                },
                Err(error) => {
                    tracing::warn!(index, error = %error, "thumbnail failed; using placeholder");
                    Thumbnail {
                        index,
                        bitmap: self.placeholder_thumbnail(index),
                        dpi: DEFAULT_DPI,
                        error: Some(error),
                    }
                }
            };
            out.push(thumb);
        }
        out
    }

    async fn thumbnail<C>(&mut self, store: &SlideStore<C>, index: usize) -> SlideResult<Bitmap> {
        let raster = self.rasterize_slide(store, index).await?;
        let scale = f64::from(self.opts.thumbnail_width) / f64::from(raster.width.max(1));
        compose(&raster, scale, Rotation::Deg0, self.opts.background)
    }

    fn placeholder_thumbnail(&mut self, index: usize) -> Bitmap {
        let width = self.opts.thumbnail_width;
        let height = (u64::from(width) * 9 / 16).max(1) as u32;
        let style = FallbackStyle {
            font_px: THUMBNAIL_FONT_PX,
            line_offset: 0.0,
            ..self.error_style(1.0)
        };
        let label = format!("Slide {}", index + 1);
        self.fallback.paint(width, height, &[label.as_str()], style)
    }

    async fn rasterize_slide<C>(
        &mut self,
        store: &SlideStore<C>,
        index: usize,
    ) -> SlideResult<Bitmap> {
        let slide = store.slide_at(index)?;
        let (width, height) = raster_extent(
            store.dimensions(),
            slide.measured_height(),
            self.opts.safety_margin,
        )?;
        let request = RasterRequest {
            width,
            height,
            background: self.opts.background,
        };

        self.stats.rasterizations += 1;
        let pending = self.rasterizer.rasterize(slide, request);
        let raster = match self.opts.raster_timeout() {
            Some(limit) => tokio::time::timeout(limit, pending).await.map_err(|_| {
                SlideError::rasterization(format!("rasterizer timed out after {limit:?}"))
            })?,
            None => pending.await,
        }
        .map_err(SlideError::into_rasterization)?;

        if (raster.width, raster.height) != (width, height) {
            return Err(SlideError::rasterization(format!(
                "rasterizer returned {}x{}, expected {width}x{height}",
                raster.width, raster.height
            )));
        }
        Ok(raster)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
