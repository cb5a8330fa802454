use std::time::Duration;

/// Convenience result type used across slidecanvas.
pub type SlideResult<T> = Result<T, SlideError>;

/// Error taxonomy shared by the slide store, the renderer and the collaborators.
#[derive(thiserror::Error, Debug)]
pub enum SlideError {
    /// The conversion collaborator produced nothing within the configured bound.
    #[error("conversion timed out after {0:?}")]
    ConversionTimeout(Duration),

    /// The conversion collaborator failed, could not be started, or produced no slides.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// A slide index outside `[0, count)`.
    #[error("slide index {index} out of range (slide count {count})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Slide count of the current presentation (0 when nothing is loaded).
        count: usize,
    },

    /// A rotation other than 0, 90, 180 or 270 degrees.
    #[error("invalid rotation: {0} degrees (expected 0, 90, 180 or 270)")]
    InvalidRotation(i32),

    /// The rasterization collaborator failed, or compositing its output failed.
    #[error("rasterization error: {0}")]
    Rasterization(String),

    /// Invalid caller-provided values (scale, configuration, bitmap shape).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlideError {
    /// Build a [`SlideError::Conversion`] value.
    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }

    /// Build a [`SlideError::Rasterization`] value.
    pub fn rasterization(msg: impl Into<String>) -> Self {
        Self::Rasterization(msg.into())
    }

    /// Build a [`SlideError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Re-tag an arbitrary error as a conversion failure, keeping conversion kinds intact.
    pub(crate) fn into_conversion(self) -> Self {
        match self {
            e @ (Self::Conversion(_) | Self::ConversionTimeout(_)) => e,
            other => Self::Conversion(other.to_string()),
        }
    }

    /// Re-tag an arbitrary error as a rasterization failure.
    pub(crate) fn into_rasterization(self) -> Self {
        match self {
            e @ Self::Rasterization(_) => e,
            other => Self::Rasterization(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
