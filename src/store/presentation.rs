use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::core::Size;

/// Rasterizable content of one slide plus its measured extent.
///
/// Immutable once created; re-measuring produces a new value.
#[derive(Clone, Debug, PartialEq)]
pub struct SlideContent {
    markup: Arc<str>,
    measured: Size,
    resources_dir: Option<PathBuf>,
}

impl SlideContent {
    /// Build slide content from markup and a measured extent.
    pub fn new(markup: impl Into<Arc<str>>, measured: Size) -> Self {
        Self {
            markup: markup.into(),
            measured,
            resources_dir: None,
        }
    }

    /// Attach the base directory for relative resources referenced by the markup.
    pub fn with_resources_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.resources_dir = dir;
        self
    }

    /// Base directory for relative resources, if the converter recorded one.
    pub fn resources_dir(&self) -> Option<&Path> {
        self.resources_dir.as_deref()
    }

    /// Static markup handed to the rasterization collaborator.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Shared handle to the markup.
    pub fn markup_handle(&self) -> Arc<str> {
        Arc::clone(&self.markup)
    }

    /// Measured content extent.
    pub fn measured(&self) -> Size {
        self.measured
    }

    /// Measured content width.
    pub fn measured_width(&self) -> f64 {
        self.measured.width
    }

    /// Measured content height.
    pub fn measured_height(&self) -> f64 {
        self.measured.height
    }
}

/// A loaded document: ordered slides plus the nominal presentation size.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    slides: Vec<SlideContent>,
    nominal: Size,
}

impl Presentation {
    pub(crate) fn new(slides: Vec<SlideContent>, nominal: Size) -> Self {
        Self { slides, nominal }
    }

    /// Slides in document order.
    pub fn slides(&self) -> &[SlideContent] {
        &self.slides
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// `true` when the presentation has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Slide at `index`, if any.
    pub fn slide(&self, index: usize) -> Option<&SlideContent> {
        self.slides.get(index)
    }

    /// Declared presentation size.
    pub fn nominal(&self) -> Size {
        self.nominal
    }
}
