//! Main UI rendering coordinator.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
};

use super::app::App;
use super::components::{chart, price_panel, stats_bar, status_bar, timeframe_bar};

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Length(5), // Price panel
            Constraint::Length(1), // Timeframe selector
            Constraint::Min(8),    // Chart
            Constraint::Length(1), // Stats
            Constraint::Length(1), // Keybindings help
        ])
        .split(frame.area());

    status_bar::render(frame, layout[0], app);
    price_panel::render(frame, layout[1], app);
    timeframe_bar::render(frame, layout[2], app);
    chart::render(frame, layout[3], app);
    stats_bar::render(frame, layout[4], app);

    let help = "[r]efresh [1-4/←→]timeframe [q]uit";
    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, layout[5]);
}
