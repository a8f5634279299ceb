use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use crate::{
    assets::font::{FontLibrary, ResolvedFont},
    foundation::{
        core::Canvas,
        error::{PostergenError, PostergenResult},
    },
    render::composite::premul_over_straight,
    templates::{
        layout::{TextField, TextFieldStyle, TextLayoutResolver},
        registry::TemplateId,
    },
    text::{engine::TextLayoutEngine, wrap::wrap},
};

/// Text to draw, per field.
pub type FieldValues = BTreeMap<TextField, String>;

/// What [`TextOverlay::apply`] did for one template.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayReport {
    /// Fields drawn, with their line counts.
    pub drawn: Vec<(TextField, usize)>,
    /// Fields that failed, with the error message. The canvas keeps whatever was drawn.
    pub failed: Vec<(TextField, String)>,
    /// Fields whose requested font was replaced by the default font.
    pub fallback_fonts: Vec<TextField>,
}

impl OverlayReport {
    /// `true` when no field failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Draws wrapped, styled text onto composited canvases.
///
/// Holds the font cache and Parley contexts; use one instance per thread.
pub struct TextOverlay<'a> {
    layouts: &'a TextLayoutResolver,
    fonts: FontLibrary,
    engine: TextLayoutEngine,
    font_data: HashMap<PathBuf, vello_cpu::peniko::FontData>,
}

impl<'a> TextOverlay<'a> {
    /// Overlay drawing styles from `layouts`; fonts resolve against `assets_root` and fall back
    /// to `default_font`.
    pub fn new(layouts: &'a TextLayoutResolver, assets_root: &Path, default_font: &Path) -> Self {
        Self {
            layouts,
            fonts: FontLibrary::new(assets_root, default_font),
            engine: TextLayoutEngine::new(),
            font_data: HashMap::new(),
        }
    }

    /// Draw every field that has both a value and a style for `template_id`.
    ///
    /// A template without styles is left untouched. A failing field is logged and recorded;
    /// the remaining fields are still drawn.
    #[tracing::instrument(skip_all, fields(template = %template_id))]
    pub fn apply(
        &mut self,
        canvas: &mut Canvas,
        field_values: &FieldValues,
        template_id: &TemplateId,
    ) -> OverlayReport {
        let mut report = OverlayReport::default();
        let layouts = self.layouts;
        if !layouts.has_template(template_id) {
            tracing::debug!("no text layout for template, skipping overlay");
            return report;
        }

        for style in layouts.styles_for(template_id) {
            let Some(text) = field_values.get(&style.field) else {
                continue;
            };
            match self.draw_field(canvas, style, text, &mut report) {
                Ok(lines) => report.drawn.push((style.field, lines)),
                Err(e) => {
                    tracing::warn!(field = style.field.as_str(), error = %e, "text overlay failed");
                    report.failed.push((style.field, e.to_string()));
                }
            }
        }
        report
    }

    fn draw_field(
        &mut self,
        canvas: &mut Canvas,
        style: &TextFieldStyle,
        text: &str,
        report: &mut OverlayReport,
    ) -> PostergenResult<usize> {
        let font = self.usable_font(style)?;
        if font.is_fallback {
            report.fallback_fonts.push(style.field);
        }

        let mut measure_err = None;
        let engine = &mut self.engine;
        let lines = wrap(text, style.wrap_policy(), |candidate| {
            match engine.measure_width(candidate, &font, style.font_size) {
                Ok(w) => w,
                Err(e) => {
                    measure_err.get_or_insert(e);
                    f32::INFINITY
                }
            }
        });
        if let Some(e) = measure_err {
            return Err(e);
        }

        tracing::info!(
            field = style.field.as_str(),
            x = style.origin_x,
            y = style.origin_y,
            font = %font.path.display(),
            lines = lines.len(),
            "placing text"
        );

        let font_data = self.font_data_for(&font);
        let mut y = style.origin_y;
        for line in &lines {
            let layout = self
                .engine
                .layout_line(line, &font, style.font_size, style.color)?;
            let height = draw_layout(canvas, &layout, &font_data, style.origin_x, y)?;
            y += height + style.line_spacing_px;
        }
        Ok(lines.len())
    }

    // Requested font if it loads and registers, otherwise the default font.
    fn usable_font(&mut self, style: &TextFieldStyle) -> PostergenResult<ResolvedFont> {
        let font = self.fonts.resolve(style.font_path.as_deref())?;
        match self.engine.family_for(&font) {
            Ok(_) => Ok(font),
            Err(e) if style.font_path.is_some() && !font.is_fallback => {
                tracing::warn!(
                    font = %font.path.display(),
                    error = %e,
                    "font not parseable, falling back to default font"
                );
                let mut fallback = self.fonts.resolve(None)?;
                self.engine.family_for(&fallback)?;
                fallback.is_fallback = true;
                Ok(fallback)
            }
            Err(e) => Err(e),
        }
    }

    fn font_data_for(&mut self, font: &ResolvedFont) -> vello_cpu::peniko::FontData {
        self.font_data
            .entry(font.path.clone())
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
                    0,
                )
            })
            .clone()
    }
}

/// Rasterize a one-line layout with its top-left at `(x, y)` and blend it onto `canvas`.
///
/// Returns the measured line height: the bottom of the drawn ink relative to `y`, or the line
/// box height when the line has no ink.
fn draw_layout(
    canvas: &mut Canvas,
    layout: &parley::Layout<crate::foundation::core::Rgba8>,
    font: &vello_cpu::peniko::FontData,
    x: f32,
    y: f32,
) -> PostergenResult<f32> {
    let box_h = layout.height();
    if layout.width() <= 0.0 {
        return Ok(box_h);
    }

    // Glyph ink can overhang the line box; rasterize with a margin.
    let pad = (box_h * 0.5).ceil().max(2.0) as u32;
    let pm_w: u16 = (layout.width().ceil() as u32 + 2 * pad)
        .try_into()
        .map_err(|_| PostergenError::overlay("text line too wide to rasterize"))?;
    let pm_h: u16 = (box_h.ceil() as u32 + 2 * pad)
        .try_into()
        .map_err(|_| PostergenError::overlay("text line too tall to rasterize"))?;

    let mut ctx = vello_cpu::RenderContext::new(pm_w, pm_h);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        f64::from(pad),
        f64::from(pad),
    )));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(pm_w, pm_h);
    ctx.render_to_pixmap(&mut pixmap);

    let origin_x = (x - pad as f32).round() as i64;
    let origin_y = (y - pad as f32).round() as i64;
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let mut ink_bottom: Option<u32> = None;

    let stride = usize::from(pm_w) * 4;
    for (row, row_px) in pixmap.data_as_u8_slice().chunks_exact(stride).enumerate() {
        let cy = origin_y + row as i64;
        for (col, px) in row_px.chunks_exact(4).enumerate() {
            if px[3] == 0 {
                continue;
            }
            ink_bottom = Some(row as u32);
            let cx = origin_x + col as i64;
            if cx < 0 || cy < 0 || cx >= cw || cy >= ch {
                continue;
            }
            let dst = canvas.get_pixel_mut(cx as u32, cy as u32);
            dst.0 = premul_over_straight(dst.0, [px[0], px[1], px[2], px[3]]);
        }
    }

    Ok(match ink_bottom {
        Some(row) => (row as f32 + 1.0 - pad as f32).max(0.0),
        None => box_h,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
