//! Headless conversion collaborator reading decks of SVG slides.
//!
//! A deck is either a directory of `*.svg` files (ordered by file name) or a JSON manifest:
//!
//! ```json
//! { "width": 1280, "height": 720, "slides": ["title.svg", "agenda.svg"] }
//! ```
//!
//! Manifest slide paths are relative to the manifest's directory.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::{Rect, Size};
use crate::foundation::error::{SlideError, SlideResult};
use crate::store::convert::{
    ConversionCollaborator, ConvertedDocument, ConvertedSlide, DocumentSource, ElementBox,
};
use crate::svg::fonts::FontSet;

/// JSON deck manifest.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeckManifest {
    /// Declared presentation width; the first slide's size is used when absent.
    #[serde(default)]
    pub width: Option<f64>,
    /// Declared presentation height.
    #[serde(default)]
    pub height: Option<f64>,
    /// Slide files in presentation order.
    pub slides: Vec<PathBuf>,
}

/// Converts SVG decks into slide content. Parsing runs on tokio's blocking pool.
#[derive(Clone, Default)]
pub struct SvgDeckConverter {
    fonts: FontSet,
}

impl SvgDeckConverter {
    /// Converter using system fonts for text measurement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter using `fonts`.
    pub fn with_fonts(fonts: FontSet) -> Self {
        Self { fonts }
    }
}

impl ConversionCollaborator for SvgDeckConverter {
    type Conversion = Pin<Box<dyn Future<Output = SlideResult<ConvertedDocument>> + Send>>;

    fn begin(&mut self, source: &DocumentSource) -> SlideResult<Self::Conversion> {
        let path = source.as_path().to_path_buf();
        if !path.exists() {
            return Err(SlideError::conversion(format!(
                "deck not found: '{}'",
                path.display()
            )));
        }
        let fonts = self.fonts.clone();
        Ok(Box::pin(async move {
            tokio::task::spawn_blocking(move || load_deck(&path, fonts.database()))
                .await
                .map_err(|e| SlideError::conversion(format!("deck loader task failed: {e}")))?
        }))
    }
}

/// Read and parse the deck at `path`.
pub fn load_deck(
    path: &Path,
    fontdb: Arc<usvg::fontdb::Database>,
) -> SlideResult<ConvertedDocument> {
    read_deck(path, fontdb).map_err(|e| SlideError::conversion(format!("{e:#}")))
}

fn read_deck(
    path: &Path,
    fontdb: Arc<usvg::fontdb::Database>,
) -> anyhow::Result<ConvertedDocument> {
    let (files, declared) = if path.is_dir() {
        (svg_files_in(path)?, None)
    } else {
        let manifest = read_manifest(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let declared = match (manifest.width, manifest.height) {
            (Some(w), Some(h)) => Some(Size::new(w, h)),
            (None, None) => None,
            _ => anyhow::bail!("manifest must declare both width and height, or neither"),
        };
        let files = manifest.slides.iter().map(|p| base.join(p)).collect();
        (files, declared)
    };

    let mut nominal = declared;
    let mut slides = Vec::with_capacity(files.len());
    for file in &files {
        let (slide, size) = read_slide(file, Arc::clone(&fontdb))?;
        nominal.get_or_insert(size);
        slides.push(slide);
    }
    tracing::debug!(deck = %path.display(), slides = slides.len(), "svg deck parsed");
    Ok(ConvertedDocument { slides, nominal })
}

fn read_manifest(path: &Path) -> anyhow::Result<DeckManifest> {
    let f = std::fs::File::open(path)
        .with_context(|| format!("open deck manifest '{}'", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| format!("parse deck manifest '{}'", path.display()))
}

fn svg_files_in(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("read deck dir '{}'", dir.display()))?
    {
        let path = entry?.path();
        let is_svg = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
        if is_svg && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn read_slide(
    path: &Path,
    fontdb: Arc<usvg::fontdb::Database>,
) -> anyhow::Result<(ConvertedSlide, Size)> {
    let markup = std::fs::read_to_string(path)
        .with_context(|| format!("read slide '{}'", path.display()))?;
    let resources_dir = path.parent().map(Path::to_path_buf);
    let opts = usvg::Options {
        resources_dir: resources_dir.clone(),
        fontdb,
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&markup, &opts)
        .with_context(|| format!("parse slide '{}'", path.display()))?;

    let mut boxes = Vec::new();
    collect_boxes(tree.root(), &mut boxes);
    let size = Size::new(
        f64::from(tree.size().width()),
        f64::from(tree.size().height()),
    );
    let mut slide = ConvertedSlide::new(markup, boxes);
    slide.resources_dir = resources_dir;
    Ok((slide, size))
}

fn collect_boxes(group: &usvg::Group, out: &mut Vec<ElementBox>) {
    for node in group.children() {
        let b = node.abs_bounding_box();
        out.push(ElementBox::new(Rect::new(
            f64::from(b.left()),
            f64::from(b.top()),
            f64::from(b.right()),
            f64::from(b.bottom()),
        )));
        if let usvg::Node::Group(g) = node {
            collect_boxes(g, out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/svg/deck.rs"]
mod tests;
