// this_file: src/layout.rs

//! Shrink-to-fit caption layout.
//!
//! Two nested searches place a caption inside an image:
//!
//! - [`layout`] runs the inner search at a fixed point size: a linear,
//!   decrement-by-one walk over the chars-per-line budget until the wrapped
//!   block's width fits (or the budget floor is reached).
//! - [`shrink_to_fit`] runs the outer search: when a point size yields no
//!   fitting layout, it re-derives metrics one point smaller and retries,
//!   down to a configured floor.
//!
//! The inner search is intentionally linear rather than binary: the budget
//! spans tens of values and each probe is a cheap wrap-and-measure.

use crate::error::{Error, Result};
use crate::metrics::{FontMetrics, MetricsSource, TextSize};
use crate::wrap::wrap;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of the target image. Both dimensions are positive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub width: u32,
    pub height: u32,
}

/// Tuning parameters for the layout searches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutParams {
    /// Initial chars-per-line budget for the inner search
    pub start_chars_per_line: usize,
    /// Floor for the chars-per-line budget
    pub min_chars_per_line: usize,
    /// Fraction of each canvas dimension the caption may occupy
    pub max_area_fraction: f32,
    /// Floor for the outer point-size search
    pub min_point_size: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            start_chars_per_line: 60,
            min_chars_per_line: 15,
            max_area_fraction: 0.8,
            min_point_size: 12.0,
        }
    }
}

/// A caption placed within a canvas: the wrapped lines, the measured block
/// size, and the centered origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionLayout {
    /// Wrapped lines, in draw order
    pub lines: Vec<String>,
    /// Widest line's rendered width
    pub width: u32,
    /// Sum of per-line rendered heights
    pub height: u32,
    /// X of the block's top-left corner, centering it horizontally
    pub origin_x: u32,
    /// Y of the block's top-left corner, centering it vertically
    pub origin_y: u32,
    /// Pixel offset for the drop-shadow copy (point size / 10)
    pub shadow_offset: u32,
    /// Point size the block was measured at
    pub point_size: f32,
}

/// Result of the inner layout search at a fixed point size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LayoutOutcome {
    /// No wrapping of the text fits within the allowed area.
    Rejected,
    /// The caption fits; invariants: `width <= canvas.width *
    /// max_area_fraction` and `height <= canvas.height * max_area_fraction`.
    Fitted(CaptionLayout),
}

impl LayoutOutcome {
    pub fn is_fitted(&self) -> bool {
        matches!(self, LayoutOutcome::Fitted(_))
    }
}

/// Wrap `text` at the given budget and measure the block: width is the
/// maximum per-line width, height the sum of per-line heights.
fn measure_block(
    text: &str,
    chars_per_line: usize,
    metrics: &dyn FontMetrics,
) -> (Vec<String>, TextSize) {
    let lines = wrap(text, chars_per_line);
    let mut block = TextSize {
        width: 0,
        height: 0,
    };
    for line in &lines {
        let size = metrics.measure(line);
        block.width = block.width.max(size.width);
        block.height += size.height;
    }
    (lines, block)
}

/// Lay out `text` within `canvas` at the metrics provider's point size.
///
/// Runs the decrement-by-one chars-per-line search; the budget only ever
/// decreases. Returns [`LayoutOutcome::Rejected`] when the final wrapping
/// still exceeds the allowed width or height.
pub fn layout(
    text: &str,
    canvas: CanvasBounds,
    metrics: &dyn FontMetrics,
    params: &LayoutParams,
) -> LayoutOutcome {
    // A fraction above 1.0 must not allow blocks wider than the canvas
    // itself; the centering arithmetic below relies on block <= canvas.
    let max_width = ((canvas.width as f32 * params.max_area_fraction) as u32).min(canvas.width);
    let max_height = ((canvas.height as f32 * params.max_area_fraction) as u32).min(canvas.height);

    let mut chars_per_line = params.start_chars_per_line;
    let (mut lines, mut block) = measure_block(text, chars_per_line, metrics);

    while block.width > max_width && chars_per_line > params.min_chars_per_line {
        chars_per_line -= 1;
        (lines, block) = measure_block(text, chars_per_line, metrics);
    }

    if block.width > max_width || block.height > max_height {
        log::debug!(
            "Layout rejected at {}pt: block {}x{} exceeds {}x{}",
            metrics.point_size(),
            block.width,
            block.height,
            max_width,
            max_height
        );
        return LayoutOutcome::Rejected;
    }

    LayoutOutcome::Fitted(CaptionLayout {
        lines,
        width: block.width,
        height: block.height,
        origin_x: (canvas.width - block.width) / 2,
        origin_y: (canvas.height - block.height) / 2,
        shadow_offset: (metrics.point_size() / 10.0) as u32,
        point_size: metrics.point_size(),
    })
}

/// Fit `text` within `canvas`, reducing the point size on each rejection.
///
/// Starts at `start_point_size` and steps down 1pt at a time; each step
/// re-derives metrics from `source` and reruns [`layout`]. Stops with
/// [`Error::NoFit`] once the next step would fall below
/// `params.min_point_size`.
pub fn shrink_to_fit(
    text: &str,
    canvas: CanvasBounds,
    source: &dyn MetricsSource,
    params: &LayoutParams,
    start_point_size: f32,
) -> Result<CaptionLayout> {
    let mut point_size = start_point_size;
    while point_size >= params.min_point_size {
        let metrics = source.at_size(point_size)?;
        match layout(text, canvas, metrics.as_ref(), params) {
            LayoutOutcome::Fitted(caption) => {
                log::info!(
                    "Caption fitted at {}pt: {} lines, {}x{}",
                    point_size,
                    caption.lines.len(),
                    caption.width,
                    caption.height
                );
                return Ok(caption);
            }
            LayoutOutcome::Rejected => {
                log::debug!("No fit at {}pt, shrinking", point_size);
                point_size -= 1.0;
            }
        }
    }
    Err(Error::NoFit {
        point_size: params.min_point_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::RefCell;

    /// Fixed-pitch metrics: every character is `cell_width` px wide and
    /// every line is `line_height` px tall.
    struct CharCellMetrics {
        cell_width: u32,
        line_height: u32,
        point_size: f32,
    }

    impl FontMetrics for CharCellMetrics {
        fn measure(&self, text: &str) -> TextSize {
            TextSize {
                width: text.chars().count() as u32 * self.cell_width,
                height: self.line_height,
            }
        }

        fn point_size(&self) -> f32 {
            self.point_size
        }
    }

    /// Metrics source producing cell widths proportional to point size,
    /// recording every size it was asked for.
    struct ScalingSource {
        requested: RefCell<Vec<f32>>,
    }

    impl ScalingSource {
        fn new() -> Self {
            Self {
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl MetricsSource for ScalingSource {
        fn at_size(&self, point_size: f32) -> crate::error::Result<Box<dyn FontMetrics + '_>> {
            self.requested.borrow_mut().push(point_size);
            Ok(Box::new(CharCellMetrics {
                cell_width: point_size as u32,
                line_height: point_size as u32 * 2,
                point_size,
            }))
        }
    }

    fn params(start: usize, min: usize, fraction: f32) -> LayoutParams {
        LayoutParams {
            start_chars_per_line: start,
            min_chars_per_line: min,
            max_area_fraction: fraction,
            min_point_size: 12.0,
        }
    }

    #[test]
    fn test_layout_fits_on_generous_canvas() {
        let metrics = CharCellMetrics {
            cell_width: 14,
            line_height: 30,
            point_size: 24.0,
        };
        let canvas = CanvasBounds {
            width: 2000,
            height: 1500,
        };
        let text = "the quick brown fox jumps over the lazy dog \
                    while twenty more words keep this caption going on and on";
        let outcome = layout(text, canvas, &metrics, &params(80, 10, 1.0));
        let LayoutOutcome::Fitted(caption) = outcome else {
            panic!("expected a fit");
        };
        assert!(caption.width <= 2000);
        assert!(caption.height <= 1500);
        assert_relative_eq!(caption.point_size, 24.0);
    }

    #[test]
    fn test_layout_rejects_pathologically_narrow_canvas() {
        let metrics = CharCellMetrics {
            cell_width: 14,
            line_height: 30,
            point_size: 24.0,
        };
        let canvas = CanvasBounds {
            width: 10,
            height: 1000,
        };
        let outcome = layout("unfittable words", canvas, &metrics, &params(80, 1, 1.0));
        assert!(!outcome.is_fitted());
    }

    #[test]
    fn test_layout_shrinks_line_budget_until_width_fits() {
        // One 74-char line at 14px/char is 1036px, over a 1000px canvas.
        // Wrapping tighter splits off the last word and the block fits.
        let metrics = CharCellMetrics {
            cell_width: 14,
            line_height: 40,
            point_size: 30.0,
        };
        let canvas = CanvasBounds {
            width: 1000,
            height: 200,
        };
        let text = "word word word word word word word word word word word word word word word";
        let outcome = layout(text, canvas, &metrics, &params(80, 40, 1.0));
        let LayoutOutcome::Fitted(caption) = outcome else {
            panic!("expected a fit after shrinking the line budget");
        };
        assert_eq!(caption.lines.len(), 2);
        assert!(caption.width <= 1000);
        assert!(caption.height <= 200);
        assert_eq!(caption.origin_x, (1000 - caption.width) / 2);
        assert_eq!(caption.origin_y, (200 - caption.height) / 2);
    }

    #[test]
    fn test_layout_rejects_when_height_exceeds_bounds() {
        // Width fits easily but ten lines at 100px each overflow vertically.
        let metrics = CharCellMetrics {
            cell_width: 5,
            line_height: 100,
            point_size: 24.0,
        };
        let canvas = CanvasBounds {
            width: 500,
            height: 300,
        };
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let outcome = layout(text, canvas, &metrics, &params(5, 5, 1.0));
        assert!(!outcome.is_fitted());
    }

    #[test]
    fn test_layout_respects_area_fraction() {
        let metrics = CharCellMetrics {
            cell_width: 10,
            line_height: 20,
            point_size: 20.0,
        };
        let canvas = CanvasBounds {
            width: 1000,
            height: 1000,
        };
        // 90 chars on one line is 900px: inside the canvas but outside the
        // 0.8 fraction; with no room to wrap tighter, it must reject.
        let word = "x".repeat(90);
        let outcome = layout(&word, canvas, &metrics, &params(100, 95, 0.8));
        assert!(!outcome.is_fitted());
    }

    #[test]
    fn test_over_unity_fraction_never_exceeds_canvas() {
        // At fraction 2.0 a 150px block would pass a naive width check on a
        // 100px canvas; it must be rejected, not centered at an underflowed
        // origin.
        let metrics = CharCellMetrics {
            cell_width: 10,
            line_height: 20,
            point_size: 20.0,
        };
        let canvas = CanvasBounds {
            width: 100,
            height: 400,
        };
        let word = "x".repeat(15);
        let outcome = layout(&word, canvas, &metrics, &params(20, 1, 2.0));
        assert!(!outcome.is_fitted());
    }

    #[test]
    fn test_shadow_offset_is_truncated_tenth_of_point_size() {
        let canvas = CanvasBounds {
            width: 2000,
            height: 2000,
        };
        // Truncating division: 48pt and 42pt both shadow at 4px.
        for (point_size, expected) in [(48.0, 4), (42.0, 4), (39.0, 3)] {
            let metrics = CharCellMetrics {
                cell_width: 8,
                line_height: 30,
                point_size,
            };
            let outcome = layout("short caption here", canvas, &metrics, &params(60, 15, 1.0));
            let LayoutOutcome::Fitted(caption) = outcome else {
                panic!("expected a fit at {}pt", point_size);
            };
            assert_eq!(caption.shadow_offset, expected);
        }
    }

    #[test]
    fn test_shrink_to_fit_descends_monotonically() {
        let source = ScalingSource::new();
        let canvas = CanvasBounds {
            width: 400,
            height: 400,
        };
        let text = "ten characters per word makes this caption fairly wide overall";
        let caption =
            shrink_to_fit(text, canvas, &source, &params(40, 10, 1.0), 30.0).expect("fit");
        assert!(caption.point_size < 30.0);

        let requested = source.requested.borrow();
        assert!(requested.windows(2).all(|w| w[1] < w[0]));
        assert_relative_eq!(requested[0], 30.0);
    }

    #[test]
    fn test_shrink_to_fit_gives_up_at_point_size_floor() {
        let source = ScalingSource::new();
        let canvas = CanvasBounds {
            width: 20,
            height: 20,
        };
        let err = shrink_to_fit(
            "never going to fit in twenty pixels",
            canvas,
            &source,
            &params(40, 1, 1.0),
            20.0,
        )
        .unwrap_err();
        assert!(matches!(err, Error::NoFit { .. }));
    }

    #[test]
    fn test_fitted_layout_serializes_with_status_tag() {
        let outcome = LayoutOutcome::Fitted(CaptionLayout {
            lines: vec!["a line".to_string()],
            width: 60,
            height: 20,
            origin_x: 470,
            origin_y: 290,
            shadow_offset: 2,
            point_size: 24.0,
        });
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"fitted\""));

        let rejected = serde_json::to_string(&LayoutOutcome::Rejected).unwrap();
        assert!(rejected.contains("\"status\":\"rejected\""));
    }
}
