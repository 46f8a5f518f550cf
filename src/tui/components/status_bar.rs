//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::tui::app::{App, ConnectionStatus, NoticeKind};

/// Renders the status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let status_color = match app.connection_status {
        ConnectionStatus::Connected => Color::Green,
        ConnectionStatus::Connecting => Color::Yellow,
        ConnectionStatus::Error => Color::Red,
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.connection_status.label()),
            Style::default().fg(status_color),
        ),
        Span::raw("│"),
        Span::styled(
            format!(" {} ", app.asset_id),
            Style::default().fg(Color::Cyan),
        ),
    ];

    if app.connection_status == ConnectionStatus::Error {
        spans.push(Span::raw("│"));
        spans.push(Span::styled(
            format!(" {} ", app.status_message),
            Style::default().fg(Color::Red),
        ));
    }

    if app.refreshing {
        spans.push(Span::raw("│"));
        spans.push(Span::styled(" Refreshing... ", Style::default().fg(Color::Yellow)));
    }

    if let Some(ref notice) = app.notice {
        let color = match notice.kind {
            NoticeKind::Info => Color::Green,
            NoticeKind::Error => Color::Red,
        };
        spans.push(Span::raw("│"));
        spans.push(Span::styled(
            format!(" {} ", notice.message),
            Style::default().fg(color),
        ));
    }

    let para = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
