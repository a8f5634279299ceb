use std::sync::Arc;

use super::*;
use crate::assets::font::probe_system_font;

fn system_font() -> Option<ResolvedFont> {
    let path = probe_system_font()?;
    let bytes = std::fs::read(&path).ok()?;
    Some(ResolvedFont {
        path,
        bytes: Arc::new(bytes),
        is_fallback: false,
    })
}

#[test]
fn measured_width_grows_with_text() {
    let Some(font) = system_font() else {
        eprintln!("no system font found, skipping");
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let short = engine.measure_width("Lost", &font, 32.0).unwrap();
    let long = engine.measure_width("Lost Key", &font, 32.0).unwrap();
    assert!(short > 0.0);
    assert!(long > short);

    let bigger = engine.measure_width("Lost", &font, 64.0).unwrap();
    assert!(bigger > short);
}

#[test]
fn family_is_registered_once_per_path() {
    let Some(font) = system_font() else {
        eprintln!("no system font found, skipping");
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let a = engine.family_for(&font).unwrap();
    let b = engine.family_for(&font).unwrap();
    assert_eq!(a, b);
    assert!(!a.trim().is_empty());
}

#[test]
fn invalid_font_bytes_are_an_overlay_error() {
    let font = ResolvedFont {
        path: PathBuf::from("garbage.ttf"),
        bytes: Arc::new(b"definitely not a font".to_vec()),
        is_fallback: false,
    };
    let mut engine = TextLayoutEngine::new();
    let Err(err) = engine.layout_line("x", &font, 12.0, Rgba8::rgb(0, 0, 0)) else {
        panic!("expected an overlay error");
    };
    assert!(matches!(err, PostergenError::Overlay(_)));
}

#[test]
fn non_positive_size_is_rejected() {
    let font = ResolvedFont {
        path: PathBuf::from("unused.ttf"),
        bytes: Arc::new(Vec::new()),
        is_fallback: false,
    };
    let mut engine = TextLayoutEngine::new();
    assert!(engine.layout_line("x", &font, 0.0, Rgba8::default()).is_err());
    assert!(engine.layout_line("x", &font, f32::NAN, Rgba8::default()).is_err());
}
