//! Static template data: the poster registry and per-template text styles.

/// Per-template, per-field text styles loaded from the layout document.
pub mod layout;
/// Ordered registry of poster templates.
pub mod registry;
