//! One poster per registered template: composite, overlay, persist.
//!
//! A failing template never aborts the run. Its [`PosterResult`] carries the error and the
//! remaining templates are still processed.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::{OutputFormat, PosterConfig},
    copy::GeneratedCopy,
    foundation::{
        core::Canvas,
        error::{PostergenError, PostergenResult},
    },
    render::{
        composite::compose,
        overlay::{FieldValues, TextOverlay},
    },
    templates::registry::{TemplateDescriptor, TemplateId},
};

/// Scheduling options for [`PosterPipeline`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineOpts {
    /// Render templates on a rayon pool instead of one after another.
    pub parallel: bool,
    /// Pool size; `None` lets rayon decide. Must be at least 1 when set.
    pub threads: Option<usize>,
    /// Restrict the run to these template ids; the others are reported as skipped.
    pub only: Option<Vec<TemplateId>>,
}

/// Outcome of one template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosterStatus {
    /// Poster written to `output_path`.
    Saved,
    /// Template excluded by [`PipelineOpts::only`].
    Skipped,
    /// Compositing or persisting failed; see `error`.
    Failed,
}

/// Per-template record, reported in registry order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PosterResult {
    /// Template this poster was rendered from.
    pub template_id: TemplateId,
    /// Target file, set even when nothing was written.
    pub output_path: PathBuf,
    /// Saved, skipped or failed.
    pub status: PosterStatus,
    /// `true` only for [`PosterStatus::Saved`].
    pub succeeded: bool,
    /// Rendered error for [`PosterStatus::Failed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PosterResult {
    fn saved(template_id: TemplateId, output_path: PathBuf) -> Self {
        Self {
            template_id,
            output_path,
            status: PosterStatus::Saved,
            succeeded: true,
            error: None,
        }
    }

    fn skipped(template_id: TemplateId, output_path: PathBuf) -> Self {
        Self {
            template_id,
            output_path,
            status: PosterStatus::Skipped,
            succeeded: false,
            error: None,
        }
    }

    fn failed(template_id: TemplateId, output_path: PathBuf, error: &PostergenError) -> Self {
        Self {
            template_id,
            output_path,
            status: PosterStatus::Failed,
            succeeded: false,
            error: Some(error.to_string()),
        }
    }
}

/// What a caller gets back from a whole run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of posters actually written.
    pub generated_count: usize,
    /// File names of the written posters, in registry order.
    pub output_files: Vec<String>,
    /// One entry per template.
    pub results: Vec<PosterResult>,
}

impl RunSummary {
    /// Summarize per-template results.
    pub fn from_results(results: Vec<PosterResult>) -> Self {
        let output_files: Vec<String> = results
            .iter()
            .filter(|r| r.status == PosterStatus::Saved)
            .filter_map(|r| r.output_path.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        Self {
            generated_count: output_files.len(),
            output_files,
            results,
        }
    }
}

/// Drives every template of a [`PosterConfig`] through compose, overlay and persist.
pub struct PosterPipeline<'a> {
    config: &'a PosterConfig,
    opts: PipelineOpts,
    pool: Option<rayon::ThreadPool>,
}

impl std::fmt::Debug for PosterPipeline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosterPipeline")
            .field("templates", &self.config.registry.len())
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl<'a> PosterPipeline<'a> {
    /// Sequential pipeline over every template.
    pub fn new(config: &'a PosterConfig) -> Self {
        Self {
            config,
            opts: PipelineOpts::default(),
            pool: None,
        }
    }

    /// Pipeline with explicit scheduling options.
    ///
    /// Fails with a validation error for `threads: Some(0)` or ids in `only` that the
    /// registry does not know.
    pub fn with_opts(config: &'a PosterConfig, opts: PipelineOpts) -> PostergenResult<Self> {
        if let Some(only) = &opts.only
            && let Some(unknown) = only.iter().find(|id| config.registry.get(id).is_none())
        {
            return Err(PostergenError::validation(format!(
                "unknown template '{unknown}' in 'only'"
            )));
        }
        let pool = if opts.parallel {
            Some(build_thread_pool(opts.threads)?)
        } else {
            None
        };
        Ok(Self { config, opts, pool })
    }

    /// Render one poster per template from `source_image` and `copy`.
    ///
    /// Always yields exactly one result per registered template, in registry order.
    #[tracing::instrument(skip_all, fields(source = %source_image.display()))]
    pub fn run(&self, source_image: &Path, copy: &GeneratedCopy) -> Vec<PosterResult> {
        let values = copy.field_values();
        let templates = self.config.registry.list();

        let results: Vec<PosterResult> = match &self.pool {
            None => {
                let mut overlay = self.new_overlay();
                templates
                    .iter()
                    .enumerate()
                    .map(|(i, t)| self.process_template(i, t, source_image, &values, &mut overlay))
                    .collect()
            }
            Some(pool) => pool.install(|| {
                templates
                    .par_iter()
                    .enumerate()
                    .map_init(
                        || self.new_overlay(),
                        |overlay, (i, t)| {
                            self.process_template(i, t, source_image, &values, overlay)
                        },
                    )
                    .collect()
            }),
        };

        let saved = results
            .iter()
            .filter(|r| r.status == PosterStatus::Saved)
            .count();
        tracing::info!(saved, total = results.len(), "poster run finished");
        results
    }

    fn new_overlay(&self) -> TextOverlay<'a> {
        TextOverlay::new(
            &self.config.layouts,
            &self.config.assets_root,
            &self.config.default_font,
        )
    }

    fn selected(&self, id: &TemplateId) -> bool {
        self.opts
            .only
            .as_ref()
            .is_none_or(|only| only.iter().any(|o| o == id))
    }

    fn process_template(
        &self,
        index: usize,
        descriptor: &TemplateDescriptor,
        source_image: &Path,
        values: &FieldValues,
        overlay: &mut TextOverlay<'a>,
    ) -> PosterResult {
        let id = descriptor.id.clone();
        let output_path = self.config.output_path(index);
        if !self.selected(&id) {
            tracing::debug!(template = %id, "template not selected");
            return PosterResult::skipped(id, output_path);
        }

        // A failed render must not leave the previous run's poster behind.
        if let Err(e) = remove_stale(&output_path) {
            tracing::warn!(template = %id, error = %e, "removing previous poster failed");
            return PosterResult::failed(id, output_path, &e);
        }

        let mut canvas = match compose(descriptor, source_image, &self.config.assets_root) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(template = %id, error = %e, "compositing failed");
                return PosterResult::failed(id, output_path, &e);
            }
        };

        let report = overlay.apply(&mut canvas, values, &id);
        if !report.is_clean() {
            tracing::warn!(
                template = %id,
                failed = report.failed.len(),
                fallback_fonts = report.fallback_fonts.len(),
                "text overlay incomplete"
            );
        }

        match persist(&canvas, &output_path, self.config.output_format) {
            Ok(()) => {
                tracing::info!(template = %id, path = %output_path.display(), "saved poster");
                PosterResult::saved(id, output_path)
            }
            Err(e) => {
                tracing::warn!(template = %id, error = %e, "saving poster failed");
                PosterResult::failed(id, output_path, &e)
            }
        }
    }
}

/// Write `canvas` to `path`, replacing a previous poster of the same name.
pub fn persist(canvas: &Canvas, path: &Path, format: OutputFormat) -> PostergenResult<()> {
    remove_stale(path)?;
    canvas
        .save_with_format(path, format.image_format())
        .map_err(|e| PostergenError::persist(format!("write '{}': {e}", path.display())))
}

fn remove_stale(path: &Path) -> PostergenResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed previous poster");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PostergenError::persist(format!(
            "remove '{}': {e}",
            path.display()
        ))),
    }
}

fn build_thread_pool(threads: Option<usize>) -> PostergenResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PostergenError::validation(
            "pipeline 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PostergenError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
