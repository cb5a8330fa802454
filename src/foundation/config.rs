use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;

use crate::foundation::core::{
    DEFAULT_SLIDE_HEIGHT, DEFAULT_SLIDE_WIDTH, MIN_SLIDE_HEIGHT, Rgba8, Size,
};
use crate::foundation::error::{SlideError, SlideResult};

/// Options controlling how [`crate::SlideStore`] loads and measures documents.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StoreOpts {
    /// Upper bound for a single conversion attempt, in milliseconds.
    pub conversion_timeout_ms: u64,
    /// Number of conversion attempts before the last error is surfaced.
    pub conversion_attempts: u32,
    /// Pause between conversion attempts, in milliseconds.
    pub retry_delay_ms: u64,
    /// Floor for every measured slide height.
    pub min_slide_height: f64,
    /// Extra room added below the deepest visible descendant.
    pub measure_padding: f64,
    /// Nominal width used when the converter does not declare one.
    pub default_width: f64,
    /// Nominal height used when the converter does not declare one.
    pub default_height: f64,
}

impl Default for StoreOpts {
    fn default() -> Self {
        Self {
            conversion_timeout_ms: 30_000,
            conversion_attempts: 1,
            retry_delay_ms: 2_000,
            min_slide_height: MIN_SLIDE_HEIGHT,
            measure_padding: 50.0,
            default_width: DEFAULT_SLIDE_WIDTH,
            default_height: DEFAULT_SLIDE_HEIGHT,
        }
    }
}

impl StoreOpts {
    /// Conversion bound as a [`Duration`].
    pub fn conversion_timeout(&self) -> Duration {
        Duration::from_millis(self.conversion_timeout_ms)
    }

    /// Retry pause as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Nominal size reported when nothing is loaded.
    pub fn default_size(&self) -> Size {
        Size::new(self.default_width, self.default_height)
    }

    /// Check option ranges.
    pub fn validate(&self) -> SlideResult<()> {
        if self.conversion_timeout_ms == 0 {
            return Err(SlideError::validation("conversion_timeout_ms must be > 0"));
        }
        if self.conversion_attempts == 0 {
            return Err(SlideError::validation("conversion_attempts must be >= 1"));
        }
        if !positive(self.default_width) || !positive(self.default_height) {
            return Err(SlideError::validation(
                "default_width/default_height must be positive",
            ));
        }
        if !self.min_slide_height.is_finite() || self.min_slide_height < 0.0 {
            return Err(SlideError::validation("min_slide_height must be >= 0"));
        }
        if !self.measure_padding.is_finite() || self.measure_padding < 0.0 {
            return Err(SlideError::validation("measure_padding must be >= 0"));
        }
        Ok(())
    }
}

/// Options controlling [`crate::Renderer`] caching, composition and fallback drawing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RendererOpts {
    /// Maximum number of composed bitmaps retained (oldest-inserted evicted first).
    pub cache_capacity: usize,
    /// Fractional padding added to the raster extent so floating content is not clipped.
    pub safety_margin: f64,
    /// Opaque fill behind every rasterized and composed slide.
    pub background: Rgba8,
    /// Optional bound on a single rasterization call, in milliseconds.
    pub raster_timeout_ms: Option<u64>,
    /// Text color of the fallback message.
    pub fallback_text_color: Rgba8,
    /// Fallback font size at scale 1.0.
    pub fallback_font_px: f64,
    /// Load system fonts for the fallback message.
    pub load_system_fonts: bool,
    /// Width of generated thumbnails.
    pub thumbnail_width: u32,
}

impl Default for RendererOpts {
    fn default() -> Self {
        Self {
            cache_capacity: 10,
            safety_margin: 0.1,
            background: Rgba8::WHITE,
            raster_timeout_ms: None,
            fallback_text_color: Rgba8::new(0x66, 0x66, 0x66, 255),
            fallback_font_px: 24.0,
            load_system_fonts: true,
            thumbnail_width: 160,
        }
    }
}

impl RendererOpts {
    /// Rasterization bound as a [`Duration`], when configured.
    pub fn raster_timeout(&self) -> Option<Duration> {
        self.raster_timeout_ms.map(Duration::from_millis)
    }

    /// Check option ranges.
    pub fn validate(&self) -> SlideResult<()> {
        if self.cache_capacity == 0 {
            return Err(SlideError::validation("cache_capacity must be >= 1"));
        }
        if !(0.0..=1.0).contains(&self.safety_margin) {
            return Err(SlideError::validation("safety_margin must be within [0, 1]"));
        }
        if !self.background.is_opaque() {
            return Err(SlideError::validation("background must be opaque"));
        }
        if self.raster_timeout_ms == Some(0) {
            return Err(SlideError::validation("raster_timeout_ms must be > 0"));
        }
        if !positive(self.fallback_font_px) {
            return Err(SlideError::validation("fallback_font_px must be positive"));
        }
        if self.thumbnail_width == 0 {
            return Err(SlideError::validation("thumbnail_width must be >= 1"));
        }
        Ok(())
    }
}

/// Complete viewer configuration, as read from a JSON file.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Load policy.
    pub store: StoreOpts,
    /// Render policy.
    pub renderer: RendererOpts,
}

impl ViewerConfig {
    /// Read and validate a configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> SlideResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SlideError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Read and validate a configuration from a JSON reader.
    pub fn from_reader(r: impl Read) -> SlideResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| SlideError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> SlideResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Check every section.
    pub fn validate(&self) -> SlideResult<()> {
        self.store.validate()?;
        self.renderer.validate()
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
