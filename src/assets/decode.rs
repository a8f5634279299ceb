use std::path::Path;

use anyhow::Context;

use crate::foundation::{core::Canvas, error::PostergenResult};

/// Decode encoded image bytes and normalize to straight RGBA8.
pub fn decode_rgba8(bytes: &[u8]) -> PostergenResult<Canvas> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

/// Read and decode an image file into straight RGBA8.
///
/// The file is read fully before decoding so no handle outlives the call.
pub fn read_rgba8(path: &Path) -> PostergenResult<Canvas> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    Ok(decode_rgba8(&bytes).with_context(|| format!("decode image '{}'", path.display()))?)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
