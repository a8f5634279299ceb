use std::io::Cursor;

use super::*;

#[test]
fn decode_png_keeps_straight_alpha() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_rgba8(&buf).unwrap();
    assert_eq!(decoded.dimensions(), (1, 1));
    assert_eq!(decoded.as_raw().as_slice(), &[100, 50, 200, 128]);
}

#[test]
fn decode_rgb_gains_opaque_alpha() {
    let img = image::RgbImage::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_rgba8(&buf).unwrap();
    assert_eq!(decoded.as_raw().as_slice(), &[1, 2, 3, 255, 4, 5, 6, 255]);
}

#[test]
fn garbage_and_missing_files_are_errors() {
    assert!(decode_rgba8(b"not an image").is_err());

    let missing = std::env::temp_dir().join("postergen_definitely_missing_image.png");
    let err = read_rgba8(&missing).unwrap_err();
    assert!(format!("{err:#}").contains("postergen_definitely_missing_image.png"));
}

#[test]
fn undecodable_file_error_names_the_path() {
    let path = std::env::temp_dir().join(format!("postergen_garbage_{}.png", std::process::id()));
    std::fs::write(&path, b"not an image").unwrap();
    let err = read_rgba8(&path).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("decode image"));
    assert!(msg.contains(&*path.file_name().unwrap().to_string_lossy()));
}
