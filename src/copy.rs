//! Poster copy (title + tagline) and the collaborator that produces it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::error::CopyGenerationError;
use crate::render::overlay::FieldValues;
use crate::templates::layout::TextField;

/// Title used when no title could be generated.
pub const FALLBACK_TITLE: &str = "Untitled";
/// Description used when no description could be generated.
pub const FALLBACK_DESCRIPTION: &str = "No description available.";

/// Title and tagline shared by every poster of one run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCopy {
    /// Short title.
    pub title: String,
    /// One- or two-sentence tagline.
    pub description: String,
}

impl GeneratedCopy {
    /// Copy with explicit values.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Deterministic copy used when generation fails.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_TITLE, FALLBACK_DESCRIPTION)
    }

    /// Field values handed to the text overlay.
    pub fn field_values(&self) -> FieldValues {
        let mut out = FieldValues::new();
        out.insert(TextField::Title, self.title.clone());
        out.insert(TextField::Description, self.description.clone());
        out
    }
}

/// External producer of poster copy for a source photo.
pub trait CopyGenerator: Send + Sync {
    /// Generate copy for the photo at `source_image`.
    fn generate(&self, source_image: &Path) -> Result<GeneratedCopy, CopyGenerationError>;
}

/// Generator returning fixed copy.
#[derive(Clone, Debug)]
pub struct StaticCopy(pub GeneratedCopy);

impl CopyGenerator for StaticCopy {
    fn generate(&self, _source_image: &Path) -> Result<GeneratedCopy, CopyGenerationError> {
        Ok(self.0.clone())
    }
}

/// Generator reading a saved model reply (`Title: ...` / `Description: ...` lines).
#[derive(Clone, Debug)]
pub struct ReplyFileCopy {
    /// Reply text file.
    pub path: PathBuf,
}

impl CopyGenerator for ReplyFileCopy {
    fn generate(&self, _source_image: &Path) -> Result<GeneratedCopy, CopyGenerationError> {
        let reply = std::fs::read_to_string(&self.path).map_err(|e| {
            CopyGenerationError::Unavailable(format!(
                "read reply '{}': {e}",
                self.path.display()
            ))
        })?;
        parse_copy_reply(&reply)
    }
}

/// Extract copy from a model reply.
///
/// Takes the first line starting with `Title:` and the first starting with `Description:`.
/// A missing line falls back to that field's default; a reply with neither is malformed.
pub fn parse_copy_reply(reply: &str) -> Result<GeneratedCopy, CopyGenerationError> {
    let field = |prefix: &str| {
        reply
            .lines()
            .find_map(|line| line.strip_prefix(prefix))
            .map(|rest| rest.trim().to_owned())
    };
    let title = field("Title:");
    let description = field("Description:");

    if title.is_none() && description.is_none() {
        return Err(CopyGenerationError::MalformedReply(
            "reply has neither a 'Title:' nor a 'Description:' line".to_owned(),
        ));
    }
    Ok(GeneratedCopy {
        title: title.unwrap_or_else(|| FALLBACK_TITLE.to_owned()),
        description: description.unwrap_or_else(|| FALLBACK_DESCRIPTION.to_owned()),
    })
}

/// Ask `generator` for copy, degrading any failure to [`GeneratedCopy::fallback`].
pub fn generate_copy_or_fallback(
    generator: &dyn CopyGenerator,
    source_image: &Path,
) -> GeneratedCopy {
    match generator.generate(source_image) {
        Ok(copy) => copy,
        Err(e) => {
            tracing::warn!(kind = e.kind(), error = %e, "copy generation failed, using fallback copy");
            GeneratedCopy::fallback()
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/copy.rs"]
mod tests;
