//! Axis-range bookkeeping for the trace plots
//!
//! Both axes share the span of the longer data range so the plot keeps a
//! square aspect, the shorter axis is centered on its own midpoint, and both
//! get a proportional padding margin. Tick positions are evenly spaced
//! across each range.
//!
//! A degenerate range (min == max on both axes) falls back to a fixed pad so
//! the returned ranges are always non-empty.

use crate::types::Bounds;

/// Fraction of the dominant span added as margin on each side
pub const DEFAULT_AXIS_PADDING: f64 = 0.1;

/// Number of tick positions per axis
pub const DEFAULT_AXIS_TICKS: usize = 10;

/// Pad applied when the data covers a single point
const DEGENERATE_PAD: f64 = 1.0;

/// Framed plot ranges with tick positions
#[derive(Debug, Clone, PartialEq)]
pub struct AxisRange {
    /// X range (min, max)
    pub x: (f64, f64),
    /// Y range (min, max)
    pub y: (f64, f64),
    /// Evenly spaced tick positions across the X range
    pub x_ticks: Vec<f64>,
    /// Evenly spaced tick positions across the Y range
    pub y_ticks: Vec<f64>,
}

impl AxisRange {
    /// Distance between adjacent X ticks
    pub fn x_step(&self) -> f64 {
        step(self.x, self.x_ticks.len())
    }

    /// Distance between adjacent Y ticks
    pub fn y_step(&self) -> f64 {
        step(self.y, self.y_ticks.len())
    }
}

fn step(range: (f64, f64), ticks: usize) -> f64 {
    if ticks > 1 {
        (range.1 - range.0) / (ticks - 1) as f64
    } else {
        range.1 - range.0
    }
}

/// Compute square-aspect plot ranges for the given bounds
///
/// The longer of the two data spans becomes the base span for both axes;
/// the shorter axis keeps its midpoint. Both ranges are widened by
/// `base_span * padding` on each side. When the data is a single point the
/// fallback pad keeps the result non-degenerate.
pub fn square_range(bounds: &Bounds, padding: f64, num_ticks: usize) -> AxisRange {
    let dx = bounds.span_x();
    let dy = bounds.span_y();

    let base = dx.max(dy);
    let pad = if base > 0.0 {
        base * padding
    } else {
        DEGENERATE_PAD
    };

    let (x, y) = if dx >= dy {
        // X is the base axis, center Y on its midpoint
        let mid_y = (bounds.min_y + bounds.max_y) / 2.0;
        (
            (bounds.min_x - pad, bounds.max_x + pad),
            (mid_y - base / 2.0 - pad, mid_y + base / 2.0 + pad),
        )
    } else {
        let mid_x = (bounds.min_x + bounds.max_x) / 2.0;
        (
            (mid_x - base / 2.0 - pad, mid_x + base / 2.0 + pad),
            (bounds.min_y - pad, bounds.max_y + pad),
        )
    };

    AxisRange {
        x,
        y,
        x_ticks: linspace(x.0, x.1, num_ticks),
        y_ticks: linspace(y.0, y.1, num_ticks),
    }
}

/// `n` evenly spaced values from `min` to `max` inclusive
pub fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (n - 1) as f64;
            (0..n).map(|i| min + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Bounds {
        let mut b = Bounds::new();
        b.update(min_x, min_y);
        b.update(max_x, max_y);
        b
    }

    #[test]
    fn test_x_dominant_range() {
        // X span 10, Y span 2: X is the base
        let range = square_range(&bounds(0.0, 10.0, 0.0, 2.0), 0.1, 10);

        assert_eq!(range.x, (-1.0, 11.0));
        // Y centered on 1.0 with the X span, plus padding
        assert_eq!(range.y, (1.0 - 5.0 - 1.0, 1.0 + 5.0 + 1.0));
        // Both axes cover the same distance
        assert!((range.x.1 - range.x.0 - (range.y.1 - range.y.0)).abs() < 1e-9);
    }

    #[test]
    fn test_y_dominant_range() {
        let range = square_range(&bounds(0.0, 2.0, -10.0, 10.0), 0.1, 10);

        assert_eq!(range.y, (-12.0, 12.0));
        // X centered on 1.0 with the Y span
        assert_eq!(range.x, (1.0 - 10.0 - 2.0, 1.0 + 10.0 + 2.0));
    }

    #[test]
    fn test_degenerate_bounds_are_padded() {
        // A single point must still produce a usable window
        let range = square_range(&bounds(3.0, 3.0, -1.0, -1.0), 0.1, 10);

        assert!(range.x.1 > range.x.0);
        assert!(range.y.1 > range.y.0);
        assert_eq!(range.x, (2.0, 4.0));
        assert_eq!(range.y, (-2.0, 0.0));
    }

    #[test]
    fn test_degenerate_single_axis() {
        // Y collapsed but X has span: normal padding path applies
        let range = square_range(&bounds(0.0, 4.0, 1.0, 1.0), 0.1, 10);
        assert!(range.y.1 > range.y.0);
        assert!((range.x.0 - -0.4).abs() < 1e-9);
        assert!((range.x.1 - 4.4).abs() < 1e-9);
    }

    #[test]
    fn test_tick_count_and_endpoints() {
        let range = square_range(&bounds(0.0, 9.0, 0.0, 9.0), 0.1, 10);

        assert_eq!(range.x_ticks.len(), 10);
        assert_eq!(range.y_ticks.len(), 10);
        assert!((range.x_ticks[0] - range.x.0).abs() < 1e-9);
        assert!((range.x_ticks[9] - range.x.1).abs() < 1e-9);
    }

    #[test]
    fn test_ticks_monotonic() {
        let range = square_range(&bounds(-5.0, 5.0, 2.0, 3.0), 0.1, 10);
        for pair in range.x_ticks.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);

        let values = linspace(0.0, 1.0, 5);
        assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_step() {
        let range = square_range(&bounds(0.0, 9.0, 0.0, 9.0), 0.0, 10);
        assert!((range.x_step() - 1.0).abs() < 1e-9);
    }
}
