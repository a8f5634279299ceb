use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::PlacementRect,
    error::{PostergenError, PostergenResult},
};

/// Identifier of a template inside a registry.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

impl TemplateId {
    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// One poster template: background image plus the rectangle the photo is pasted into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TemplateDescriptor {
    /// Unique template id.
    pub id: TemplateId,
    /// Background image path, relative to the assets root unless absolute.
    pub background_path: PathBuf,
    /// Where the source photo goes, in background pixels.
    pub placement: PlacementRect,
}

/// Ordered, non-empty, validated list of templates.
///
/// The order fixes output numbering: the template at index `i` writes `output{i+1}`.
#[derive(Clone, Debug)]
pub struct TemplateRegistry {
    templates: Vec<TemplateDescriptor>,
}

// (background file, x, y, w, h) of the stock poster set.
const BUILTIN: [(&str, u32, u32, u32, u32); 16] = [
    ("templates/template1-Photoroom.png", 74, 126, 286, 399),
    ("templates/template2-Photoroom.png", 365, 24, 680, 952),
    ("templates/template3-Photoroom.png", 502, 72, 322, 449),
    ("templates/template4-Photoroom.png", 140, 152, 691, 970),
    ("templates/template5-Photoroom.png", 86, 235, 470, 655),
    ("templates/template6-Photoroom.png", 1594, 183, 583, 818),
    ("templates/template7-Photoroom.png", 954, 202, 478, 668),
    ("templates/template8-Photoroom.png", 410, 363, 518, 728),
    ("templates/template9-Photoroom.png", 643, 363, 275, 384),
    ("templates/template10-Photoroom.png", 1862, 418, 388, 544),
    ("templates/template11-Photoroom.png", 214, 318, 400, 562),
    ("templates/template12-Photoroom.png", 263, 208, 604, 842),
    ("templates/template13-Photoroom.png", 334, 582, 338, 476),
    ("templates/template14-Photoroom.png", 1066, 386, 455, 638),
    ("templates/template15-Photoroom.png", 336, 550, 410, 570),
    ("templates/template16-Photoroom.png", 168, 366, 514, 720),
];

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateDef {
    id: String,
    background: PathBuf,
    rect: [u32; 4],
}

impl TemplateRegistry {
    /// Validate and wrap `templates`.
    ///
    /// Rejects an empty list, duplicate ids and empty placement rectangles.
    pub fn new(templates: Vec<TemplateDescriptor>) -> PostergenResult<Self> {
        if templates.is_empty() {
            return Err(PostergenError::config_load(
                "template registry must not be empty",
            ));
        }
        let mut seen = HashSet::with_capacity(templates.len());
        for t in &templates {
            if t.id.0.trim().is_empty() {
                return Err(PostergenError::config_load("template id must be non-empty"));
            }
            if !seen.insert(&t.id) {
                return Err(PostergenError::config_load(format!(
                    "duplicate template id '{}'",
                    t.id
                )));
            }
            if t.placement.width == 0 || t.placement.height == 0 {
                return Err(PostergenError::config_load(format!(
                    "template '{}' has an empty placement rect",
                    t.id
                )));
            }
        }
        Ok(Self { templates })
    }

    /// The sixteen stock poster templates (`template1` .. `template16`).
    pub fn builtin() -> Self {
        let templates = BUILTIN
            .iter()
            .enumerate()
            .map(|(i, &(bg, x, y, width, height))| TemplateDescriptor {
                id: TemplateId(format!("template{}", i + 1)),
                background_path: PathBuf::from(bg),
                placement: PlacementRect {
                    x,
                    y,
                    width,
                    height,
                },
            })
            .collect();
        Self { templates }
    }

    /// Parse a JSON array of `{ "id", "background", "rect": [x, y, w, h] }`.
    pub fn from_json_str(json: &str) -> PostergenResult<Self> {
        let defs: Vec<TemplateDef> = serde_json::from_str(json)
            .map_err(|e| PostergenError::config_load(format!("template registry: {e}")))?;
        let templates = defs
            .into_iter()
            .map(|d| {
                let [x, y, w, h] = d.rect;
                let placement = PlacementRect::new(x, y, w, h).map_err(|e| {
                    PostergenError::config_load(format!("template '{}': {e}", d.id))
                })?;
                Ok(TemplateDescriptor {
                    id: TemplateId(d.id),
                    background_path: d.background,
                    placement,
                })
            })
            .collect::<PostergenResult<Vec<_>>>()?;
        Self::new(templates)
    }

    /// Load a registry JSON file (see [`TemplateRegistry::from_json_str`]).
    pub fn from_path(path: &Path) -> PostergenResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read template registry '{}'", path.display()))
            .map_err(|e| PostergenError::config_load(format!("{e:#}")))?;
        Self::from_json_str(&json)
    }

    /// Templates in output order.
    pub fn list(&self) -> &[TemplateDescriptor] {
        &self.templates
    }

    /// Number of templates (always >= 1).
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Lookup by id.
    pub fn get(&self, id: &TemplateId) -> Option<&TemplateDescriptor> {
        self.templates.iter().find(|t| &t.id == id)
    }

    /// Lookup by id or by background path as written in the registry.
    ///
    /// Layout documents written for the stock poster set key templates by background path.
    pub fn resolve(&self, key: &str) -> Option<&TemplateDescriptor> {
        let norm = key.replace('\\', "/");
        self.templates.iter().find(|t| {
            t.id.as_str() == key || t.background_path.to_string_lossy().replace('\\', "/") == norm
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/templates/registry.rs"]
mod tests;
