use image::Rgba;

use super::*;
use crate::{assets::font::probe_system_font, foundation::core::Rgba8};

fn style(template: &str, field: TextField, font_path: Option<PathBuf>) -> TextFieldStyle {
    TextFieldStyle {
        template_id: TemplateId::from(template),
        field,
        font_path,
        font_size: 32.0,
        color: Rgba8::rgb(255, 255, 255),
        origin_x: 10.0,
        origin_y: 10.0,
        words_per_line: 5,
        line_spacing_px: 10.0,
        max_width_px: None,
    }
}

fn values() -> FieldValues {
    let mut v = FieldValues::new();
    v.insert(TextField::Title, "Lost Key".to_string());
    v.insert(
        TextField::Description,
        "A gripping tale filled with mystery and wonder".to_string(),
    );
    v
}

fn blank() -> Canvas {
    Canvas::from_pixel(640, 320, Rgba([0, 0, 0, 255]))
}

fn changed_rows(before: &Canvas, after: &Canvas) -> Vec<u32> {
    let mut rows = Vec::new();
    for y in 0..before.height() {
        if (0..before.width()).any(|x| before.get_pixel(x, y) != after.get_pixel(x, y)) {
            rows.push(y);
        }
    }
    rows
}

#[test]
fn template_without_styles_is_left_untouched() {
    let layouts = TextLayoutResolver::from_styles([style("other", TextField::Title, None)]);
    let root = std::env::temp_dir();
    let mut overlay = TextOverlay::new(&layouts, &root, Path::new("no-such-font.ttf"));

    let before = blank();
    let mut canvas = before.clone();
    let report = overlay.apply(&mut canvas, &values(), &TemplateId::from("poster"));
    assert_eq!(report, OverlayReport::default());
    assert_eq!(canvas.as_raw(), before.as_raw());
}

#[test]
fn draws_wrapped_lines_below_each_other() {
    let Some(font) = probe_system_font() else {
        eprintln!("no system font found, skipping");
        return;
    };
    let mut description = style("poster", TextField::Description, None);
    description.origin_y = 100.0;
    let layouts = TextLayoutResolver::from_styles([description]);
    let root = std::env::temp_dir();
    let mut overlay = TextOverlay::new(&layouts, &root, &font);

    let before = blank();
    let mut canvas = before.clone();
    let report = overlay.apply(&mut canvas, &values(), &TemplateId::from("poster"));
    assert!(report.is_clean(), "{report:?}");
    assert_eq!(report.drawn, vec![(TextField::Description, 2)]);

    let rows = changed_rows(&before, &canvas);
    assert!(!rows.is_empty());
    assert!(*rows.first().unwrap() >= 100);
    // The second line starts below the first line's ink plus spacing.
    assert!(*rows.last().unwrap() > 100 + 32);
}

#[test]
fn missing_font_falls_back_and_still_draws() {
    let Some(font) = probe_system_font() else {
        eprintln!("no system font found, skipping");
        return;
    };
    let layouts = TextLayoutResolver::from_styles([style(
        "poster",
        TextField::Title,
        Some(PathBuf::from("fonts/missing.ttf")),
    )]);
    let root = std::env::temp_dir();
    let mut overlay = TextOverlay::new(&layouts, &root, &font);

    let before = blank();
    let mut canvas = before.clone();
    let report = overlay.apply(&mut canvas, &values(), &TemplateId::from("poster"));
    assert_eq!(report.fallback_fonts, vec![TextField::Title]);
    assert_eq!(report.drawn, vec![(TextField::Title, 1)]);
    assert_ne!(canvas.as_raw(), before.as_raw());
}

#[test]
fn failing_field_does_not_stop_the_others() {
    let Some(font) = probe_system_font() else {
        eprintln!("no system font found, skipping");
        return;
    };
    let root = std::env::temp_dir();
    let title = style("poster", TextField::Title, Some(font.clone()));
    let description = style(
        "poster",
        TextField::Description,
        Some(PathBuf::from("fonts/missing.ttf")),
    );
    let layouts = TextLayoutResolver::from_styles([title, description]);
    // No usable default font: the description has nothing to fall back to.
    let mut overlay = TextOverlay::new(&layouts, &root, Path::new("postergen-no-default.ttf"));

    let before = blank();
    let mut canvas = before.clone();
    let report = overlay.apply(&mut canvas, &values(), &TemplateId::from("poster"));
    assert_eq!(report.drawn, vec![(TextField::Title, 1)]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, TextField::Description);
    assert_ne!(canvas.as_raw(), before.as_raw());
}

#[test]
fn fields_without_values_are_not_drawn() {
    let layouts = TextLayoutResolver::from_styles([style("poster", TextField::Title, None)]);
    let root = std::env::temp_dir();
    let mut overlay = TextOverlay::new(&layouts, &root, Path::new("no-such-font.ttf"));

    let before = blank();
    let mut canvas = before.clone();
    let report = overlay.apply(&mut canvas, &FieldValues::new(), &TemplateId::from("poster"));
    assert!(report.drawn.is_empty());
    assert!(report.failed.is_empty());
    assert_eq!(canvas.as_raw(), before.as_raw());
}

#[test]
fn width_policy_wraps_by_measured_width() {
    let Some(font) = probe_system_font() else {
        eprintln!("no system font found, skipping");
        return;
    };
    let mut description = style("poster", TextField::Description, None);
    description.max_width_px = Some(200.0);
    let layouts = TextLayoutResolver::from_styles([description]);
    let root = std::env::temp_dir();
    let mut overlay = TextOverlay::new(&layouts, &root, &font);

    let mut canvas = blank();
    let report = overlay.apply(&mut canvas, &values(), &TemplateId::from("poster"));
    let (_, lines) = report.drawn[0];
    assert!(lines >= 3, "expected narrow wrapping, got {lines} lines");
}
