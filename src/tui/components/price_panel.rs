//! Current price and 24h market figures.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rust_decimal::Decimal;

use crate::format;
use crate::tui::app::App;

/// Renders the price panel.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(format!(" {} ", app.asset_id))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(snapshot) = app.snapshot.as_ref() else {
        let para = Paragraph::new("No data").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(para.block(block), area);
        return;
    };

    let change_color = if snapshot.change_pct >= Decimal::ZERO {
        Color::Green
    } else {
        Color::Red
    };
    let arrow = if snapshot.change_pct >= Decimal::ZERO {
        "▲"
    } else {
        "▼"
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", snapshot.symbol.to_uppercase()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{} ", format::usd(snapshot.price)),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(arrow, Style::default().fg(change_color)),
            Span::styled(
                format!(" {}", format::percent_change(snapshot.change_pct)),
                Style::default().fg(change_color),
            ),
        ]),
        Line::from(vec![
            Span::raw(" High 24h: "),
            Span::styled(format::usd(snapshot.high_24h), Style::default().fg(Color::Green)),
            Span::raw("  Low 24h: "),
            Span::styled(format::usd(snapshot.low_24h), Style::default().fg(Color::Red)),
            Span::raw("  Volume: "),
            Span::raw(format::large_usd(snapshot.volume_24h)),
            Span::raw("  Market cap: "),
            Span::raw(format::large_usd(snapshot.market_cap)),
        ]),
        Line::from(Span::styled(
            format!(" Updated {}", format::last_update(snapshot.fetched_at)),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
