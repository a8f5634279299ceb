//! Text shaping, measurement and line wrapping.

/// Parley-backed shaping and measurement.
pub mod engine;
/// Pure line-wrapping policies.
pub mod wrap;
