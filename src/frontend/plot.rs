//! Trace plot rendering using egui_plot
//!
//! Renders one [`TraceSeries`] per plot. While auto-framing is on, the plot
//! bounds come from [`square_range`], so both axes share the span of the
//! longer data range (square aspect) with a padding margin, and grid lines
//! follow the computed tick spacing. Dragging the plot hands control to the
//! user; the reset button re-enables auto-framing.

use crate::axis::{square_range, AxisRange};
use crate::config::{TraceConfig, UiConfig};
use crate::types::TraceSeries;
use egui::{Color32, Ui};
use egui_plot::{GridMark, Line, Plot, PlotBounds, PlotPoints, Points};

/// Plot configuration and view state for one trace
#[derive(Debug, Clone)]
pub struct TraceView {
    /// Whether to show grid lines
    pub show_grid: bool,
    /// Trace line width
    pub line_width: f32,
    /// Whether to show markers at accepted points
    pub show_markers: bool,
    /// Axis padding fraction
    pub axis_padding: f64,
    /// Tick positions per axis
    pub axis_ticks: usize,
    /// Whether the view follows the data bounds
    pub auto_frame: bool,
}

impl Default for TraceView {
    fn default() -> Self {
        Self {
            show_grid: true,
            line_width: 1.5,
            show_markers: false,
            axis_padding: crate::axis::DEFAULT_AXIS_PADDING,
            axis_ticks: crate::axis::DEFAULT_AXIS_TICKS,
            auto_frame: true,
        }
    }
}

impl TraceView {
    /// Create a view from configuration
    pub fn from_config(ui: &UiConfig, trace: &TraceConfig) -> Self {
        Self {
            show_grid: ui.show_grid,
            line_width: ui.line_width,
            show_markers: ui.show_markers,
            axis_padding: trace.axis_padding,
            axis_ticks: trace.axis_ticks,
            auto_frame: true,
        }
    }

    /// Re-enable auto-framing
    pub fn reset_view(&mut self) {
        self.auto_frame = true;
    }

    /// Render the trace
    pub fn render(&mut self, ui: &mut Ui, series: &TraceSeries) {
        let range = series
            .bounds
            .is_valid()
            .then(|| square_range(&series.bounds, self.axis_padding, self.axis_ticks));

        let mut plot = Plot::new(format!("trace_{}", series.origin))
            .allow_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .show_axes(true)
            .show_grid(self.show_grid)
            .x_axis_label("x (m)")
            .y_axis_label("y (m)");

        // Grid lines at the computed tick spacing
        if let Some(r) = &range {
            let x_step = r.x_step();
            let y_step = r.y_step();
            plot = plot
                .x_grid_spacer(move |input| grid_marks(input.bounds, x_step))
                .y_grid_spacer(move |input| grid_marks(input.bounds, y_step));
        }

        let auto_frame = self.auto_frame;
        let response = plot.show(ui, |plot_ui| {
            if auto_frame {
                if let Some(r) = &range {
                    plot_ui.set_plot_bounds(bounds_from_range(r));
                }
            }

            if series.is_empty() {
                return;
            }

            let color = series.origin.color();
            let color = Color32::from_rgb(color[0], color[1], color[2]);
            let points = series.as_plot_points();

            let line = Line::new(series.origin.to_string(), PlotPoints::from(points.clone()))
                .color(color)
                .width(self.line_width);
            plot_ui.line(line);

            if self.show_markers {
                plot_ui.points(
                    Points::new("accepted_points", PlotPoints::from(points))
                        .color(color)
                        .radius(2.0),
                );
            }

            // Highlight the current position
            if let Some(last) = series.last_point() {
                plot_ui.points(
                    Points::new("current_position", PlotPoints::from(vec![last]))
                        .color(Color32::WHITE)
                        .radius(3.5),
                );
            }
        });

        // User took over the view
        let zoomed = response.response.hovered() && ui.input(|i| i.raw_scroll_delta.y.abs() > 0.0);
        if response.response.dragged() || zoomed {
            self.auto_frame = false;
        }
    }
}

fn bounds_from_range(range: &AxisRange) -> PlotBounds {
    PlotBounds::from_min_max([range.x.0, range.y.0], [range.x.1, range.y.1])
}

/// Grid marks at a fixed step across the visible bounds
fn grid_marks(bounds: (f64, f64), step: f64) -> Vec<GridMark> {
    let (min, max) = bounds;
    if step <= 0.0 || !step.is_finite() {
        return Vec::new();
    }

    let mut marks = Vec::new();
    let mut current = (min / step).floor() * step;
    while current <= max {
        marks.push(GridMark {
            value: current,
            step_size: step,
        });
        current += step;
    }
    marks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Origin;

    #[test]
    fn test_trace_view_default() {
        let view = TraceView::default();
        assert!(view.show_grid);
        assert!(view.auto_frame);
        assert_eq!(view.axis_ticks, crate::axis::DEFAULT_AXIS_TICKS);
    }

    #[test]
    fn test_from_config() {
        let mut ui = UiConfig::default();
        ui.line_width = 3.0;
        ui.show_markers = true;
        let trace = TraceConfig::default();

        let view = TraceView::from_config(&ui, &trace);
        assert_eq!(view.line_width, 3.0);
        assert!(view.show_markers);
    }

    #[test]
    fn test_reset_view() {
        let mut view = TraceView::default();
        view.auto_frame = false;
        view.reset_view();
        assert!(view.auto_frame);
    }

    #[test]
    fn test_grid_marks_cover_bounds() {
        let marks = grid_marks((0.0, 10.0), 1.0);
        assert!(!marks.is_empty());
        assert!(marks.first().unwrap().value <= 0.0);
        assert!(marks.last().unwrap().value <= 10.0);
        for pair in marks.windows(2) {
            assert!((pair[1].value - pair[0].value - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_grid_marks_bad_step() {
        assert!(grid_marks((0.0, 10.0), 0.0).is_empty());
        assert!(grid_marks((0.0, 10.0), f64::NAN).is_empty());
    }

    #[test]
    fn test_bounds_from_range() {
        let mut bounds = crate::types::Bounds::new();
        bounds.update(0.0, 0.0);
        bounds.update(10.0, 2.0);
        let range = square_range(&bounds, 0.1, 10);
        let plot_bounds = bounds_from_range(&range);

        assert_eq!(plot_bounds.min()[0], range.x.0);
        assert_eq!(plot_bounds.max()[1], range.y.1);
    }

    #[test]
    fn test_render_inputs_for_empty_series() {
        // An empty series produces no range; rendering must not need one
        let series = TraceSeries::new(Origin::Slam);
        assert!(!series.bounds.is_valid());
    }
}
