use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::foundation::core::{Rect, Size};
use crate::foundation::error::SlideResult;

/// Locator for a presentation document, handed verbatim to the conversion collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentSource(String);

impl DocumentSource {
    /// Wrap a locator (URL, path, or any collaborator-specific key).
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// The raw locator.
    pub fn locator(&self) -> &str {
        &self.0
    }

    /// The locator interpreted as a filesystem path.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentSource {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DocumentSource {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<PathBuf> for DocumentSource {
    fn from(p: PathBuf) -> Self {
        Self(p.to_string_lossy().into_owned())
    }
}

/// Rendered box of one descendant of a converted slide, relative to the slide's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementBox {
    /// Border box in slide coordinates.
    pub rect: Rect,
    /// Computed bottom margin (counts towards the content extent).
    pub margin_bottom: f64,
}

impl ElementBox {
    /// Box without margin.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            margin_bottom: 0.0,
        }
    }

    /// Set the bottom margin.
    pub fn with_margin_bottom(mut self, margin_bottom: f64) -> Self {
        self.margin_bottom = margin_bottom;
        self
    }

    /// Boxes with no rendered height do not contribute to the content extent.
    pub fn is_visible(&self) -> bool {
        self.rect.height() > 0.0 && self.rect.is_finite()
    }
}

/// One slide-shaped content node produced by a conversion collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertedSlide {
    /// Static markup equivalent to the node.
    pub markup: String,
    /// Rendered boxes of the node's descendants.
    pub boxes: Vec<ElementBox>,
    /// Base directory for relative resource references in the markup.
    pub resources_dir: Option<PathBuf>,
}

impl ConvertedSlide {
    /// Build a converted slide.
    pub fn new(markup: impl Into<String>, boxes: Vec<ElementBox>) -> Self {
        Self {
            markup: markup.into(),
            boxes,
            resources_dir: None,
        }
    }

    /// Resolve relative resources in the markup against `dir`.
    pub fn with_resources_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resources_dir = Some(dir.into());
        self
    }
}

/// Everything a conversion collaborator produces for a document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConvertedDocument {
    /// Slides in document order.
    pub slides: Vec<ConvertedSlide>,
    /// Declared presentation size, if the document carries one.
    pub nominal: Option<Size>,
}

/// External component translating a document source into slide content nodes.
///
/// `begin` is the synchronous initiation step: an `Err` here means the collaborator could not
/// even be started. The returned future resolves exactly once, with the converted document or
/// the failure the collaborator reported. Dropping the future cancels the conversion.
pub trait ConversionCollaborator {
    /// Pending conversion.
    type Conversion: Future<Output = SlideResult<ConvertedDocument>>;

    /// Start converting `source`.
    fn begin(&mut self, source: &DocumentSource) -> SlideResult<Self::Conversion>;

    /// Called after a pending conversion was abandoned because it exceeded the load bound.
    fn abort(&mut self) {}

    /// Release any off-screen resources held on behalf of the loaded document.
    fn release(&mut self) {}
}

/// Post-processing applied to every converted slide before it is measured.
pub type MarkupHook = Box<dyn Fn(&mut ConvertedSlide) + Send + Sync>;
