//! Process-wide configuration, built once and passed by reference into the pipeline.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{PostergenError, PostergenResult},
    pipeline::PipelineOpts,
    templates::{layout::TextLayoutResolver, registry::TemplateRegistry},
};

/// Lossless encodings a poster can be written in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// PNG.
    #[default]
    Png,
    /// Lossless WebP.
    Webp,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    /// Matching `image` encoder format.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

/// Paths and options of a poster run, as read from a settings file or the command line.
///
/// Relative paths resolve against `assets_root`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PosterSettings {
    /// Base directory for every relative path below.
    pub assets_root: PathBuf,
    /// The uploaded cover photo.
    pub input_image: PathBuf,
    /// Where `output<N>.<ext>` files are written.
    pub output_dir: PathBuf,
    /// Text layout document (`templateKey -> field -> style`).
    pub text_layout: PathBuf,
    /// Custom template registry; `None` uses the stock templates.
    pub templates: Option<PathBuf>,
    /// Font used when a style names no font or an unusable one.
    pub default_font: PathBuf,
    /// Output encoding.
    pub output_format: OutputFormat,
    /// Pipeline scheduling options.
    pub pipeline: PipelineOpts,
}

impl Default for PosterSettings {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("."),
            input_image: PathBuf::from("uploads/image1.jpg"),
            output_dir: PathBuf::from("static/output"),
            text_layout: PathBuf::from("text_positions.json"),
            templates: None,
            default_font: PathBuf::from("Arial.ttf"),
            output_format: OutputFormat::Png,
            pipeline: PipelineOpts::default(),
        }
    }
}

impl PosterSettings {
    /// Read settings from a JSON file; missing keys keep their defaults.
    pub fn from_path(path: &Path) -> PostergenResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))
            .map_err(|e| PostergenError::config_load(format!("{e:#}")))?;
        serde_json::from_str(&json).map_err(|e| {
            PostergenError::config_load(format!("settings '{}': {e}", path.display()))
        })
    }

    /// `p` joined onto the assets root unless it is absolute.
    pub fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.assets_root.join(p)
        }
    }
}

/// Loaded, validated, read-only data shared by every template of a run.
#[derive(Clone, Debug)]
pub struct PosterConfig {
    /// Templates in output order.
    pub registry: TemplateRegistry,
    /// Text styles validated against `registry`.
    pub layouts: TextLayoutResolver,
    /// Base directory for relative background and font paths.
    pub assets_root: PathBuf,
    /// The cover photo pasted into every template.
    pub input_image: PathBuf,
    /// Directory receiving the posters.
    pub output_dir: PathBuf,
    /// Fallback font.
    pub default_font: PathBuf,
    /// Output encoding.
    pub output_format: OutputFormat,
}

impl PosterConfig {
    /// Load the registry and text layout document named by `settings`.
    ///
    /// Any failure here is a [`PostergenError::ConfigLoad`] and fatal to the run.
    pub fn load(settings: &PosterSettings) -> PostergenResult<Self> {
        let registry = match &settings.templates {
            Some(p) => TemplateRegistry::from_path(&settings.resolve(p))?,
            None => TemplateRegistry::builtin(),
        };
        let layouts =
            TextLayoutResolver::from_path(&settings.resolve(&settings.text_layout), &registry)?;

        tracing::info!(
            templates = registry.len(),
            styles = layouts.len(),
            "loaded poster configuration"
        );
        Ok(Self {
            registry,
            layouts,
            assets_root: settings.assets_root.clone(),
            input_image: settings.resolve(&settings.input_image),
            output_dir: settings.resolve(&settings.output_dir),
            default_font: settings.resolve(&settings.default_font),
            output_format: settings.output_format,
        })
    }

    /// Output path of the template at `index` (`output{index+1}.{ext}`).
    pub fn output_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(output_file_name(index, self.output_format))
    }
}

/// `output{index+1}.{ext}`.
pub fn output_file_name(index: usize, format: OutputFormat) -> String {
    format!("output{}.{}", index + 1, format.extension())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
