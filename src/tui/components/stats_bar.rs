//! Statistics line for the selected timeframe.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use rust_decimal::Decimal;

use crate::format;
use crate::stats::StatsUnavailable;
use crate::tui::app::App;

/// Renders min/max/change of the rendered series.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let line = match app.stats.as_ref() {
        None => Line::from(Span::styled(" --", Style::default().fg(Color::DarkGray))),
        Some(view) => match &view.stats {
            Ok(stats) => {
                let color = if stats.change_pct >= Decimal::ZERO {
                    Color::Green
                } else {
                    Color::Red
                };
                Line::from(vec![
                    Span::raw(format!(" {}  ", view.label)),
                    Span::raw("Min: "),
                    Span::styled(format::usd(stats.min), Style::default().fg(Color::Red)),
                    Span::raw("  Max: "),
                    Span::styled(format::usd(stats.max), Style::default().fg(Color::Green)),
                    Span::raw("  Change: "),
                    Span::styled(
                        format::percent_change(stats.change_pct),
                        Style::default().fg(color),
                    ),
                ])
            }
            Err(reason) => {
                let text = match reason {
                    StatsUnavailable::EmptySeries => "no data",
                    StatsUnavailable::ZeroBaseline => "unavailable",
                };
                Line::from(Span::styled(
                    format!(" {}  {text}", view.label),
                    Style::default().fg(Color::DarkGray),
                ))
            }
        },
    };

    frame.render_widget(Paragraph::new(line), area);
}
