//! Postergen turns one uploaded photo and a short piece of generated copy into a set of
//! book-cover posters, one per registered template.
//!
//! # Pipeline overview
//!
//! 1. **Load**: [`PosterSettings`] -> [`PosterConfig`] (template registry plus text layouts)
//! 2. **Copy**: a [`CopyGenerator`] produces a title and description, degrading to fallback text
//! 3. **Compose**: each template background gets the photo pasted into its placement rectangle
//! 4. **Overlay**: title and description are wrapped and drawn with their per-template style
//! 5. **Persist**: the poster is written as `output<N>.png` (or `.webp`)
//!
//! A template that fails to compose or persist is reported in its [`PosterResult`]; the run
//! keeps going. Only configuration loading is fatal.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

/// Process-wide settings and the loaded configuration.
pub mod config;
/// Title and description generation.
pub mod copy;
/// The per-template poster pipeline.
pub mod pipeline;
/// Compositing and text overlay.
pub mod render;
pub mod templates;
pub mod text;

pub use crate::assets::{
    decode::{decode_rgba8, read_rgba8},
    font::{FontLibrary, ResolvedFont},
};
pub use crate::config::{OutputFormat, PosterConfig, PosterSettings};
pub use crate::copy::{
    CopyGenerator, GeneratedCopy, ReplyFileCopy, StaticCopy, generate_copy_or_fallback,
    parse_copy_reply,
};
pub use crate::foundation::core::{Canvas, PlacementRect, Rgba8};
pub use crate::foundation::error::{CopyGenerationError, PostergenError, PostergenResult};
pub use crate::pipeline::{PipelineOpts, PosterPipeline, PosterResult, PosterStatus, RunSummary};
pub use crate::templates::{
    layout::{TextField, TextFieldStyle, TextLayoutResolver},
    registry::{TemplateDescriptor, TemplateId, TemplateRegistry},
};

/// Load configuration, generate copy and render every template.
///
/// The output directory is created when missing; failing to create it is only logged, so the
/// individual saves report the problem per template. Copy generation never fails the run.
#[tracing::instrument(skip_all)]
pub fn generate_posters(
    settings: &PosterSettings,
    generator: &dyn CopyGenerator,
) -> PostergenResult<RunSummary> {
    let config = PosterConfig::load(settings)?;
    let pipeline = PosterPipeline::with_opts(&config, settings.pipeline.clone())?;

    if let Err(e) = std::fs::create_dir_all(&config.output_dir) {
        tracing::warn!(
            dir = %config.output_dir.display(),
            error = %e,
            "could not create output directory"
        );
    }

    let copy = generate_copy_or_fallback(generator, &config.input_image);
    let results = pipeline.run(&config.input_image, &copy);
    Ok(RunSummary::from_results(results))
}
