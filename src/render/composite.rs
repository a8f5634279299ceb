use std::path::Path;

use image::imageops::FilterType;

use crate::{
    assets::decode::read_rgba8,
    foundation::{
        core::{Canvas, PlacementRect},
        error::{PostergenError, PostergenResult},
    },
    templates::registry::TemplateDescriptor,
};

/// Load the template background and the source photo, then paste the photo into the
/// template's placement rectangle.
///
/// Relative background paths resolve against `assets_root`.
#[tracing::instrument(skip_all, fields(template = %descriptor.id))]
pub fn compose(
    descriptor: &TemplateDescriptor,
    source_image: &Path,
    assets_root: &Path,
) -> PostergenResult<Canvas> {
    let bg_path = if descriptor.background_path.is_absolute() {
        descriptor.background_path.clone()
    } else {
        assets_root.join(&descriptor.background_path)
    };

    let background = read_rgba8(&bg_path).map_err(|e| {
        PostergenError::composition(format!("template '{}' background: {e:#}", descriptor.id))
    })?;
    let source = read_rgba8(source_image).map_err(|e| {
        PostergenError::composition(format!("template '{}' source image: {e:#}", descriptor.id))
    })?;

    Ok(compose_images(&background, &source, descriptor.placement))
}

/// Pure compositing core of [`compose`].
///
/// The source is stretched to exactly the placement size with Lanczos3 (aspect ratio is not
/// kept) and pasted using its own alpha as the mask. Parts outside the canvas are clipped.
pub fn compose_images(background: &Canvas, source: &Canvas, placement: PlacementRect) -> Canvas {
    let resized = image::imageops::resize(
        source,
        placement.width,
        placement.height,
        FilterType::Lanczos3,
    );

    // Same as pasting the background onto a transparent canvas of its own size.
    let mut canvas = background.clone();
    paste_with_alpha_mask(&mut canvas, &resized, placement.x, placement.y);
    canvas
}

/// Paste `top` at `(x, y)`, blending every channel (alpha included) by `top`'s alpha.
pub fn paste_with_alpha_mask(canvas: &mut Canvas, top: &Canvas, x: u32, y: u32) {
    let (cw, ch) = canvas.dimensions();
    if x >= cw || y >= ch {
        return;
    }
    let w = top.width().min(cw - x);
    let h = top.height().min(ch - y);

    for ty in 0..h {
        for tx in 0..w {
            let src = top.get_pixel(tx, ty).0;
            let dst = canvas.get_pixel_mut(x + tx, y + ty);
            dst.0 = mask_blend(dst.0, src);
        }
    }
}

/// `out = src * a + dst * (1 - a)` per channel with `a = src.alpha`.
pub fn mask_blend(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let a = u16::from(src[3]);
    if a == 255 {
        return src;
    }
    if a == 0 {
        return dst;
    }
    let inv = 255 - a;
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(
            mul_div255(u16::from(src[i]), a),
            mul_div255(u16::from(dst[i]), inv),
        );
    }
    out
}

/// Source-over of a premultiplied `src` onto a straight-alpha `dst`; result is straight.
pub fn premul_over_straight(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let dst_cov = u32::from(mul_div255(u16::from(dst[3]), (255 - sa) as u16));
    let out_a = sa + dst_cov;
    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * 255 + u32::from(dst[i]) * dst_cov;
        out[i] = ((num + out_a / 2) / out_a).min(255) as u8;
    }
    out[3] = out_a.min(255) as u8;
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
