use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        core::Rgba8,
        error::{PostergenError, PostergenResult},
    },
    templates::registry::{TemplateId, TemplateRegistry},
    text::wrap::WrapPolicy,
};

/// Words per line when a style does not say.
pub const DEFAULT_WORDS_PER_LINE: usize = 5;
/// Extra pixels between lines when a style does not say.
pub const DEFAULT_LINE_SPACING_PX: f32 = 10.0;

/// Text fields a poster can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    /// Short generated title.
    Title,
    /// Generated tagline.
    Description,
}

impl TextField {
    /// All fields in drawing order.
    pub const ALL: [TextField; 2] = [TextField::Title, TextField::Description];

    /// Name used in the layout document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
        }
    }

    /// Parse a layout document field name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            _ => None,
        }
    }
}

/// Composite lookup key for a style.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleKey {
    /// Template the style belongs to.
    pub template_id: TemplateId,
    /// Field the style renders.
    pub field: TextField,
}

/// Rendering configuration for one field on one template.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextFieldStyle {
    /// Owning template.
    pub template_id: TemplateId,
    /// Rendered field.
    pub field: TextField,
    /// Requested font file; `None` uses the default font.
    pub font_path: Option<PathBuf>,
    /// Font size in pixels.
    pub font_size: f32,
    /// Fill color, applied as given.
    pub color: Rgba8,
    /// Left edge of every line.
    pub origin_x: f32,
    /// Top of the first line.
    pub origin_y: f32,
    /// Words per line for word-count wrapping (>= 1).
    pub words_per_line: usize,
    /// Extra vertical gap after each line.
    pub line_spacing_px: f32,
    /// When set, wrap by measured pixel width instead of word count.
    pub max_width_px: Option<f32>,
}

impl TextFieldStyle {
    /// Lookup key of this style.
    pub fn key(&self) -> StyleKey {
        StyleKey {
            template_id: self.template_id.clone(),
            field: self.field,
        }
    }

    /// Wrapping policy selected by this style.
    pub fn wrap_policy(&self) -> WrapPolicy {
        match self.max_width_px {
            Some(px) => WrapPolicy::Width(px),
            None => WrapPolicy::Words(self.words_per_line),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err("font_size must be finite and > 0".to_owned());
        }
        if !self.origin_x.is_finite() || !self.origin_y.is_finite() {
            return Err("x/y must be finite".to_owned());
        }
        if !self.line_spacing_px.is_finite() {
            return Err("line_spacing must be finite".to_owned());
        }
        if let Some(w) = self.max_width_px
            && (!w.is_finite() || w <= 0.0)
        {
            return Err("max_width must be finite and > 0".to_owned());
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct StyleDef {
    x: f32,
    y: f32,
    font_size: f32,
    font_color: Rgba8,
    #[serde(default)]
    font_path: Option<PathBuf>,
    #[serde(default = "default_words_per_line")]
    words_per_line: usize,
    #[serde(default = "default_line_spacing")]
    line_spacing: f32,
    #[serde(default)]
    max_width: Option<f32>,
}

fn default_words_per_line() -> usize {
    DEFAULT_WORDS_PER_LINE
}

fn default_line_spacing() -> f32 {
    DEFAULT_LINE_SPACING_PX
}

/// Strongly typed `(template, field) -> style` mapping.
#[derive(Clone, Debug, Default)]
pub struct TextLayoutResolver {
    styles: BTreeMap<StyleKey, TextFieldStyle>,
    skipped: Vec<String>,
}

impl TextLayoutResolver {
    /// Resolver without any styles: no template receives text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from already validated styles; later entries replace earlier ones with the same key.
    pub fn from_styles(styles: impl IntoIterator<Item = TextFieldStyle>) -> Self {
        let mut out = Self::default();
        for s in styles {
            out.styles.insert(s.key(), s);
        }
        out
    }

    /// Parse a layout document and validate it against `registry`.
    ///
    /// Invalid JSON or a non-object top level is a [`PostergenError::ConfigLoad`]. Unknown
    /// templates, unknown fields and malformed styles are skipped with a warning.
    pub fn from_json_str(json: &str, registry: &TemplateRegistry) -> PostergenResult<Self> {
        let doc: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| PostergenError::config_load(format!("text layout document: {e}")))?;
        let serde_json::Value::Object(templates) = doc else {
            return Err(PostergenError::config_load(
                "text layout document must be a JSON object keyed by template",
            ));
        };

        let mut out = Self::default();
        for (template_key, fields) in templates {
            let Some(template) = registry.resolve(&template_key) else {
                out.skip(format!("unknown template '{template_key}'"));
                continue;
            };
            let serde_json::Value::Object(fields) = fields else {
                out.skip(format!("template '{template_key}': entry is not an object"));
                continue;
            };

            for (field_name, raw) in fields {
                let Some(field) = TextField::parse(&field_name) else {
                    out.skip(format!(
                        "template '{template_key}': unknown field '{field_name}'"
                    ));
                    continue;
                };
                let def: StyleDef = match serde_json::from_value(raw) {
                    Ok(def) => def,
                    Err(e) => {
                        out.skip(format!("template '{template_key}' field '{field_name}': {e}"));
                        continue;
                    }
                };
                let style = TextFieldStyle {
                    template_id: template.id.clone(),
                    field,
                    font_path: def.font_path,
                    font_size: def.font_size,
                    color: def.font_color,
                    origin_x: def.x,
                    origin_y: def.y,
                    words_per_line: def.words_per_line.max(1),
                    line_spacing_px: def.line_spacing,
                    max_width_px: def.max_width,
                };
                if let Err(e) = style.validate() {
                    out.skip(format!("template '{template_key}' field '{field_name}': {e}"));
                    continue;
                }
                if out.styles.insert(style.key(), style).is_some() {
                    tracing::warn!(
                        template = %template.id,
                        field = field.as_str(),
                        "duplicate text style, later entry wins"
                    );
                }
            }
        }

        tracing::debug!(
            styles = out.styles.len(),
            skipped = out.skipped.len(),
            "loaded text layout document"
        );
        Ok(out)
    }

    /// Read and parse a layout document file.
    pub fn from_path(path: &Path, registry: &TemplateRegistry) -> PostergenResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read text layout document '{}'", path.display()))
            .map_err(|e| PostergenError::config_load(format!("{e:#}")))?;
        Self::from_json_str(&json, registry)
    }

    /// Style for one key.
    pub fn get(&self, key: &StyleKey) -> Option<&TextFieldStyle> {
        self.styles.get(key)
    }

    /// Styles of one template in field order.
    pub fn styles_for<'a>(
        &'a self,
        template_id: &'a TemplateId,
    ) -> impl Iterator<Item = &'a TextFieldStyle> + 'a {
        self.styles
            .values()
            .filter(move |s| &s.template_id == template_id)
    }

    /// Whether any style exists for `template_id`.
    pub fn has_template(&self, template_id: &TemplateId) -> bool {
        self.styles_for(template_id).next().is_some()
    }

    /// Number of loaded styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether no style was loaded.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Reasons for entries dropped while loading.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    fn skip(&mut self, reason: String) {
        tracing::warn!(reason = %reason, "skipping text layout entry");
        self.skipped.push(reason);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/templates/layout.rs"]
mod tests;
