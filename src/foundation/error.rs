/// Convenience result type used across postergen.
pub type PostergenResult<T> = Result<T, PostergenError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only [`PostergenError::ConfigLoad`] is fatal to a poster run. The pipeline records the other
/// kinds against the template they occurred in and moves on.
#[derive(thiserror::Error, Debug)]
pub enum PostergenError {
    /// Template registry or text layout document missing, unparsable or invalid.
    #[error("config load error: {0}")]
    ConfigLoad(String),

    /// Background or source image could not be read or decoded.
    #[error("composition error: {0}")]
    Composition(String),

    /// Font resolution or text drawing failed for a field.
    #[error("overlay error: {0}")]
    Overlay(String),

    /// Output file could not be removed, encoded or written.
    #[error("persist error: {0}")]
    Persist(String),

    /// Invalid programmatic input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PostergenError {
    /// Build a [`PostergenError::ConfigLoad`] value.
    pub fn config_load(msg: impl Into<String>) -> Self {
        Self::ConfigLoad(msg.into())
    }

    /// Build a [`PostergenError::Composition`] value.
    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    /// Build a [`PostergenError::Overlay`] value.
    pub fn overlay(msg: impl Into<String>) -> Self {
        Self::Overlay(msg.into())
    }

    /// Build a [`PostergenError::Persist`] value.
    pub fn persist(msg: impl Into<String>) -> Self {
        Self::Persist(msg.into())
    }

    /// Build a [`PostergenError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Failure of the external copy-generation collaborator.
///
/// Never surfaces from a poster run: callers degrade it to
/// [`GeneratedCopy::fallback`](crate::GeneratedCopy::fallback).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CopyGenerationError {
    /// The collaborator could not be reached or returned no usable reply.
    #[error("copy generation unavailable: {0}")]
    Unavailable(String),

    /// A reply arrived but carried neither a title nor a description.
    #[error("copy generation reply malformed: {0}")]
    MalformedReply(String),
}

impl CopyGenerationError {
    /// Short machine-friendly name of the error kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::MalformedReply(_) => "malformed_reply",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
