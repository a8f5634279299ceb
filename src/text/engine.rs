use std::{collections::HashMap, path::PathBuf};

use crate::{
    assets::font::ResolvedFont,
    foundation::{
        core::Rgba8,
        error::{PostergenError, PostergenResult},
    },
};

/// Stateful helper for building single-line Parley layouts from raw font bytes.
///
/// Each font file is registered once; later layouts reuse its family name.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    families: HashMap<PathBuf, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextLayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayoutEngine")
            .field("families", &self.families)
            .finish_non_exhaustive()
    }
}

impl TextLayoutEngine {
    /// Construct a new engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    /// Family name registered for `font`, registering the bytes on first use.
    pub fn family_for(&mut self, font: &ResolvedFont) -> PostergenResult<String> {
        if let Some(name) = self.families.get(&font.path) {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            PostergenError::overlay(format!(
                "no font families registered from '{}'",
                font.path.display()
            ))
        })?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PostergenError::overlay("registered font family has no name"))?
            .to_string();

        self.families.insert(font.path.clone(), name.clone());
        Ok(name)
    }

    /// Shape `text` as one unbroken line.
    pub fn layout_line(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
        brush: Rgba8,
    ) -> PostergenResult<parley::Layout<Rgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PostergenError::overlay(
                "text size_px must be finite and > 0",
            ));
        }
        let family_name = self.family_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }

    /// Advance width of `text` set on one line.
    pub fn measure_width(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
    ) -> PostergenResult<f32> {
        Ok(self
            .layout_line(text, font, size_px, Rgba8::default())?
            .width())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
