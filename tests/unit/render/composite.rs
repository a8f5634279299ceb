use std::path::PathBuf;

use image::Rgba;

use super::*;
use crate::templates::registry::TemplateId;

fn solid(w: u32, h: u32, px: [u8; 4]) -> Canvas {
    Canvas::from_pixel(w, h, Rgba(px))
}

fn gradient(w: u32, h: u32) -> Canvas {
    Canvas::from_fn(w, h, |x, y| {
        Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

#[test]
fn placement_region_is_exactly_the_rect() {
    let bg = solid(300, 300, [0, 0, 255, 255]);
    let src = solid(37, 53, [255, 0, 0, 255]);
    let rect = PlacementRect::new(0, 0, 100, 200).unwrap();

    let canvas = compose_images(&bg, &src, rect);
    assert_eq!(canvas.dimensions(), (300, 300));
    for y in 0..300 {
        for x in 0..300 {
            let inside = x < 100 && y < 200;
            let expected = if inside {
                [255, 0, 0, 255]
            } else {
                [0, 0, 255, 255]
            };
            assert_eq!(canvas.get_pixel(x, y).0, expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn compositing_is_idempotent() {
    let bg = gradient(120, 90);
    let src = gradient(64, 64);
    let rect = PlacementRect::new(10, 20, 50, 40).unwrap();
    let a = compose_images(&bg, &src, rect);
    let b = compose_images(&bg, &src, rect);
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn transparent_source_does_not_occlude_background() {
    let bg = gradient(40, 40);
    let src = solid(10, 10, [255, 255, 255, 0]);
    let rect = PlacementRect::new(5, 5, 20, 20).unwrap();
    let canvas = compose_images(&bg, &src, rect);
    assert_eq!(canvas.as_raw(), bg.as_raw());
}

#[test]
fn rect_past_the_canvas_edge_is_clipped() {
    let bg = solid(50, 50, [0, 0, 0, 255]);
    let src = solid(8, 8, [0, 255, 0, 255]);
    let rect = PlacementRect::new(40, 45, 30, 30).unwrap();
    let canvas = compose_images(&bg, &src, rect);
    assert_eq!(canvas.get_pixel(49, 49).0, [0, 255, 0, 255]);
    assert_eq!(canvas.get_pixel(39, 49).0, [0, 0, 0, 255]);

    let off = PlacementRect::new(500, 500, 10, 10).unwrap();
    assert_eq!(compose_images(&bg, &src, off).as_raw(), bg.as_raw());
}

#[test]
fn mask_blend_mixes_all_channels() {
    assert_eq!(mask_blend([10, 20, 30, 40], [1, 2, 3, 0]), [10, 20, 30, 40]);
    assert_eq!(mask_blend([10, 20, 30, 40], [1, 2, 3, 255]), [1, 2, 3, 255]);
    assert_eq!(mask_blend([0, 0, 0, 0], [255, 255, 255, 128]), [128, 128, 128, 64]);
}

#[test]
fn premul_over_straight_unpremultiplies() {
    assert_eq!(premul_over_straight([0, 0, 0, 0], [64, 0, 0, 128]), [128, 0, 0, 128]);
    assert_eq!(premul_over_straight([9, 9, 9, 255], [0, 0, 0, 0]), [9, 9, 9, 255]);
    assert_eq!(premul_over_straight([9, 9, 9, 255], [200, 100, 50, 255]), [200, 100, 50, 255]);

    let out = premul_over_straight([0, 0, 255, 255], [128, 0, 0, 128]);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 128);
    assert!((126..=128).contains(&out[2]));
}

#[test]
fn compose_reports_missing_background_as_composition_error() {
    let root = std::env::temp_dir().join(format!("postergen_compose_{}", std::process::id()));
    std::fs::create_dir_all(&root).unwrap();
    let src_path = root.join("src.png");
    solid(4, 4, [1, 2, 3, 255]).save(&src_path).unwrap();

    let descriptor = TemplateDescriptor {
        id: TemplateId::from("t"),
        background_path: PathBuf::from("missing-background.png"),
        placement: PlacementRect::new(0, 0, 2, 2).unwrap(),
    };
    let err = compose(&descriptor, &src_path, &root).unwrap_err();
    assert!(matches!(err, PostergenError::Composition(_)));
    assert!(err.to_string().contains("missing-background.png"));

    std::fs::write(root.join("bg.png"), b"").unwrap();
    let descriptor = TemplateDescriptor {
        background_path: PathBuf::from("bg.png"),
        ..descriptor
    };
    assert!(matches!(
        compose(&descriptor, &src_path, &root),
        Err(PostergenError::Composition(_))
    ));
}
