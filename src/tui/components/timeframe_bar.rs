//! Timeframe selector component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::sink::HistoryState;
use crate::tui::app::App;

/// Renders the timeframe selector with a load marker per entry.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans: Vec<Span> = Vec::new();

    for (i, tf) in app.timeframes.iter().enumerate() {
        let style = if i == app.selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let (marker, marker_color) = match tf.state {
            HistoryState::NotLoaded => ("·", Color::DarkGray),
            HistoryState::Loading => ("…", Color::Yellow),
            HistoryState::Loaded => (" ", Color::Reset),
            HistoryState::Failed(_) => ("!", Color::Red),
        };

        spans.push(Span::styled(format!(" {} ", tf.key), style));
        spans.push(Span::styled(marker, Style::default().fg(marker_color)));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
