// this_file: src/metrics.rs

//! Font metrics capabilities consumed by the layout engine.
//!
//! The engine never touches font files directly; it measures rendered text
//! through these traits. `fonts` provides the production implementation.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Rendered size of a piece of text, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSize {
    pub width: u32,
    pub height: u32,
}

/// Measures rendered text for a fixed font resource at a fixed point size.
///
/// Must be a pure function of the input string: calling `measure` twice
/// with the same text yields the same size.
pub trait FontMetrics {
    /// Rendered size of a single line of text.
    fn measure(&self, text: &str) -> TextSize;

    /// Point size this provider measures at.
    fn point_size(&self) -> f32;
}

/// Re-derives a [`FontMetrics`] at an arbitrary point size.
///
/// The shrink-to-fit outer loop uses this to retry layout at progressively
/// smaller sizes when the current size does not fit.
pub trait MetricsSource {
    fn at_size(&self, point_size: f32) -> Result<Box<dyn FontMetrics + '_>>;
}
