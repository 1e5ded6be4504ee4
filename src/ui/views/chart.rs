//! Time series chart
//!
//! Created when the owning panel mounts it and destroyed when dropped, like
//! the chart instance of a browser charting library.

use crate::consts::cli_consts::ui::MAX_CHART_POINTS;
use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType};

#[derive(Debug)]
pub struct ChartView {
    container: String,
    area: Rect,
    points: Vec<(f64, f64)>,
}

impl ChartView {
    pub fn mount(container: impl Into<String>) -> Self {
        let container = container.into();
        log::debug!("Created chart {}", container);
        Self {
            container,
            area: Rect::default(),
            points: Vec::new(),
        }
    }

    /// Records the area the chart is drawn into.
    pub fn resize(&mut self, area: Rect) {
        if self.area != area {
            log::trace!(
                "Resized chart {} to {}x{}",
                self.container,
                area.width,
                area.height
            );
            self.area = area;
        }
    }

    /// Replaces the series. Only the most recent points are kept.
    pub fn set_points(&mut self, points: impl IntoIterator<Item = (f64, f64)>) {
        let mut points: Vec<(f64, f64)> = points.into_iter().collect();
        if points.len() > MAX_CHART_POINTS {
            points.drain(..points.len() - MAX_CHART_POINTS);
        }
        self.points = points;
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        bounds(self.points.iter().map(|(x, _)| *x))
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        bounds(self.points.iter().map(|(_, y)| *y))
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        self.resize(area);

        let [x_min, x_max] = self.x_bounds();
        let [y_min, y_max] = self.y_bounds();
        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::LightGreen))
            .data(&self.points);

        let chart = Chart::new(vec![dataset])
            .x_axis(
                Axis::default()
                    .title("Time")
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([x_min, x_max])
                    .labels([time_label(x_min), time_label(x_max)]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([y_min, y_max])
                    .labels([format!("{:.1}", y_min), format!("{:.1}", y_max)]),
            );
        f.render_widget(chart, area);
    }
}

impl Drop for ChartView {
    fn drop(&mut self) {
        log::debug!("Destroyed chart {}", self.container);
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        [0.0, 1.0]
    } else if min == max {
        [min - 1.0, max + 1.0]
    } else {
        [min, max]
    }
}

/// Formats a millisecond timestamp for the datetime axis.
pub fn time_label(millis: f64) -> String {
    DateTime::from_timestamp_millis(millis as i64)
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_of_empty_and_flat_series() {
        let mut chart = ChartView::mount("chart-empty");
        assert_eq!(chart.x_bounds(), [0.0, 1.0]);

        chart.set_points([(10.0, 5.0)]);
        assert_eq!(chart.x_bounds(), [9.0, 11.0]);
        assert_eq!(chart.y_bounds(), [4.0, 6.0]);

        chart.set_points([(10.0, 5.0), (20.0, -1.0)]);
        assert_eq!(chart.x_bounds(), [10.0, 20.0]);
        assert_eq!(chart.y_bounds(), [-1.0, 5.0]);
    }

    #[test]
    fn test_keeps_most_recent_points() {
        let mut chart = ChartView::mount("chart-long");
        chart.set_points((0..MAX_CHART_POINTS + 10).map(|i| (i as f64, 0.0)));
        assert_eq!(chart.points().len(), MAX_CHART_POINTS);
        assert_eq!(chart.points()[0].0, 10.0);
    }

    #[test]
    fn test_resize_records_area() {
        let mut chart = ChartView::mount("chart-r");
        let area = Rect::new(0, 0, 40, 10);
        chart.resize(area);
        assert_eq!(chart.area, area);
        assert_eq!(chart.container, "chart-r");
    }

    #[test]
    fn test_time_label_format() {
        let label = time_label(0.0);
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
    }
}
