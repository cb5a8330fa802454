use std::sync::Arc;

use crate::foundation::config::StoreOpts;
use crate::foundation::core::Size;
use crate::foundation::error::{SlideError, SlideResult};
use crate::store::convert::{
    ConversionCollaborator, ConvertedDocument, ConvertedSlide, DocumentSource, MarkupHook,
};
use crate::store::measure::{MeasureParams, measure_slide};
use crate::store::presentation::{Presentation, SlideContent};

/// Owns the post-conversion representation of one document.
///
/// A store is bound to one conversion collaborator. Every successful [`SlideStore::load`] and
/// every [`SlideStore::dispose`] of a loaded document bumps [`SlideStore::generation`]; renderers
/// compare generations to drop caches built from an earlier document.
pub struct SlideStore<C> {
    collaborator: C,
    opts: StoreOpts,
    hook: Option<MarkupHook>,
    presentation: Option<Arc<Presentation>>,
    generation: u64,
}

impl<C> SlideStore<C> {
    /// Create an empty store with default options.
    pub fn new(collaborator: C) -> Self {
        Self {
            collaborator,
            opts: StoreOpts::default(),
            hook: None,
            presentation: None,
            generation: 0,
        }
    }

    /// Create an empty store with validated options.
    pub fn with_opts(collaborator: C, opts: StoreOpts) -> SlideResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            ..Self::new(collaborator)
        })
    }

    /// Install a post-processing hook applied to each converted slide before measurement.
    pub fn set_markup_hook(&mut self, hook: impl Fn(&mut ConvertedSlide) + Send + Sync + 'static) {
        self.hook = Some(Box::new(hook));
    }

    /// Load options.
    pub fn opts(&self) -> &StoreOpts {
        &self.opts
    }

    /// The conversion collaborator.
    pub fn collaborator(&self) -> &C {
        &self.collaborator
    }

    /// The currently loaded presentation, if any.
    pub fn presentation(&self) -> Option<&Arc<Presentation>> {
        self.presentation.as_ref()
    }

    /// Counter identifying the currently loaded document.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of slides, or 0 when nothing is loaded.
    pub fn slide_count(&self) -> usize {
        self.presentation.as_ref().map_or(0, |p| p.len())
    }

    /// Nominal presentation size, or the configured default when nothing is loaded.
    pub fn dimensions(&self) -> Size {
        self.presentation
            .as_ref()
            .map_or_else(|| self.opts.default_size(), |p| p.nominal())
    }

    /// Slide at `index`.
    pub fn slide_at(&self, index: usize) -> SlideResult<&SlideContent> {
        let count = self.slide_count();
        self.presentation
            .as_ref()
            .and_then(|p| p.slide(index))
            .ok_or(SlideError::IndexOutOfRange { index, count })
    }

    fn install(&mut self, doc: ConvertedDocument) -> SlideResult<Arc<Presentation>> {
        let nominal = doc.nominal.unwrap_or_else(|| self.opts.default_size());
        if !(nominal.width.is_finite()
            && nominal.height.is_finite()
            && nominal.width > 0.0
            && nominal.height > 0.0)
        {
            return Err(SlideError::conversion(format!(
                "converter declared an invalid presentation size {}x{}",
                nominal.width, nominal.height
            )));
        }

        let params = MeasureParams {
            nominal,
            min_height: self.opts.min_slide_height,
            padding: self.opts.measure_padding,
        };
        let slides = doc
            .slides
            .into_iter()
            .enumerate()
            .map(|(idx, mut slide)| {
                if let Some(hook) = &self.hook {
                    hook(&mut slide);
                }
                let measured = measure_slide(&slide.boxes, params);
                tracing::debug!(
                    slide = idx,
                    width = measured.width,
                    height = measured.height,
                    "measured slide"
                );
                SlideContent::new(slide.markup, measured).with_resources_dir(slide.resources_dir)
            })
            .collect();

        let presentation = Arc::new(Presentation::new(slides, nominal));
        self.presentation = Some(Arc::clone(&presentation));
        self.generation = self.generation.wrapping_add(1);
        Ok(presentation)
    }
}

impl<C: ConversionCollaborator> SlideStore<C> {
    /// Convert `source` and install the result as the current presentation.
    ///
    /// On failure the previously installed presentation (if any) stays in place.
    #[tracing::instrument(skip(self, source), fields(source = %source))]
    pub async fn load(&mut self, source: &DocumentSource) -> SlideResult<Arc<Presentation>> {
        let attempts = self.opts.conversion_attempts.max(1);
        let mut last_err = None;
        for attempt in 1..=attempts {
            match self.convert_once(source).await {
                Ok(doc) => {
                    let presentation = self.install(doc)?;
                    tracing::info!(
                        slides = presentation.len(),
                        width = presentation.nominal().width,
                        height = presentation.nominal().height,
                        "presentation loaded"
                    );
                    return Ok(presentation);
                }
                Err(err) => {
                    tracing::warn!(attempt, attempts, error = %err, "conversion attempt failed");
                    last_err = Some(err);
                    if attempt < attempts {
                        tokio::time::sleep(self.opts.retry_delay()).await;
                    }
                }
            }
        }
        Err(last_err.unwrap_or_else(|| SlideError::conversion("no conversion attempt was made")))
    }

    async fn convert_once(&mut self, source: &DocumentSource) -> SlideResult<ConvertedDocument> {
        let pending = self
            .collaborator
            .begin(source)
            .map_err(|e| SlideError::conversion(format!("failed to start conversion: {e}")))?;

        let limit = self.opts.conversion_timeout();
        match tokio::time::timeout(limit, pending).await {
            Ok(Ok(doc)) if doc.slides.is_empty() => {
                Err(SlideError::conversion("converter produced no slides"))
            }
            Ok(Ok(doc)) => Ok(doc),
            Ok(Err(err)) => Err(err.into_conversion()),
            Err(_) => {
                self.collaborator.abort();
                Err(SlideError::ConversionTimeout(limit))
            }
        }
    }

    /// Drop the loaded presentation and release collaborator-owned resources. Idempotent.
    pub fn dispose(&mut self) {
        if self.presentation.take().is_some() {
            self.generation = self.generation.wrapping_add(1);
            tracing::debug!("presentation disposed");
        }
        self.collaborator.release();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/slide_store.rs"]
mod tests;
