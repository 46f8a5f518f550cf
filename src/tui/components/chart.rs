//! Line chart of the selected series.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::format;
use crate::sink::ChartSeries;
use crate::tui::app::App;

/// Renders the chart panel.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Price [{}] ", app.selected_timeframe().label);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let points = app.chart.as_ref().map(plot_points).unwrap_or_default();
    let (Some(series), Some((x_bounds, y_bounds))) = (app.chart.as_ref(), bounds(&points)) else {
        let para = Paragraph::new("No chart data").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(para.block(block), area);
        return;
    };

    let x_labels: Vec<String> = [x_bounds[0], (x_bounds[0] + x_bounds[1]) / 2.0, x_bounds[1]]
        .iter()
        .map(|ts| format::axis_label(*ts as i64, series.axis_unit))
        .collect();
    let y_labels: Vec<String> = [y_bounds[0], (y_bounds[0] + y_bounds[1]) / 2.0, y_bounds[1]]
        .iter()
        .map(|v| format::usd(Decimal::from_f64_retain(*v).unwrap_or_default()))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds(y_bounds)
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

/// Converts a series into `(timestamp, price)` pairs for plotting.
fn plot_points(series: &ChartSeries) -> Vec<(f64, f64)> {
    series
        .timestamps
        .iter()
        .zip(&series.values)
        .filter_map(|(ts, value)| Some((*ts as f64, value.to_f64()?)))
        .collect()
}

/// X and Y axis bounds with 5% vertical padding. A flat series gets a
/// unit-wide band so the line stays visible.
fn bounds(points: &[(f64, f64)]) -> Option<([f64; 2], [f64; 2])> {
    let first = points.first()?;
    let (mut x_min, mut x_max) = (first.0, first.0);
    let (mut y_min, mut y_max) = (first.1, first.1);
    for (x, y) in points {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }

    let padding = if y_max > y_min {
        (y_max - y_min) * 0.05
    } else {
        0.5
    };
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }

    Some(([x_min, x_max], [y_min - padding, y_max + padding]))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::timeframe::AxisUnit;

    #[test]
    fn plot_points_pairs_columns() {
        let series = ChartSeries {
            timestamps: vec![1000, 2000],
            values: vec![dec!(100.5), dec!(101)],
            axis_unit: AxisUnit::Hour,
        };
        assert_eq!(plot_points(&series), vec![(1000.0, 100.5), (2000.0, 101.0)]);
    }

    #[test]
    fn bounds_of_empty_series() {
        assert!(bounds(&[]).is_none());
    }

    #[test]
    fn bounds_pad_price_range() {
        let (x, y) = bounds(&[(0.0, 100.0), (10.0, 120.0), (20.0, 110.0)]).unwrap();
        assert_eq!(x, [0.0, 20.0]);
        assert_eq!(y, [99.0, 121.0]);
    }

    #[test]
    fn flat_single_point_still_has_extent() {
        let (x, y) = bounds(&[(5.0, 42.0)]).unwrap();
        assert_eq!(x, [5.0, 6.0]);
        assert_eq!(y, [41.5, 42.5]);
    }
}
