//! Raster stages of a poster: photo compositing and text overlay.

/// Background plus photo compositing.
pub mod composite;
/// Styled, wrapped text drawn onto a composed canvas.
pub mod overlay;
