//! Application state for the TUI.

use std::time::{Duration, Instant};

use crate::format;
use crate::models::Snapshot;
use crate::sink::{ChartSeries, ConnectionState, DisplayEvent, HistoryState};
use crate::stats::{SeriesStats, StatsUnavailable};
use crate::timeframe;

/// How long a notice stays on screen.
const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Central application state container.
///
/// Everything here mirrors what the coordinator published; the UI never
/// derives market state on its own.
pub struct App {
    /// Tracked CoinGecko asset id.
    pub asset_id: String,
    /// Latest snapshot, if any arrived.
    pub snapshot: Option<Snapshot>,
    /// API status indicator.
    pub connection_status: ConnectionStatus,
    /// Message accompanying the status indicator.
    pub status_message: String,
    /// Timeframes in display order with their load state.
    pub timeframes: Vec<TimeframeEntry>,
    /// Index of the selected timeframe.
    pub selected: usize,
    /// Statistics of the selected series.
    pub stats: Option<StatsView>,
    /// Last rendered chart series.
    pub chart: Option<ChartSeries>,
    /// Transient feedback for user-triggered actions.
    pub notice: Option<Notice>,
    /// A manual refresh is outstanding.
    pub refreshing: bool,
    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates the initial state with `default_timeframe` selected.
    pub fn new(asset_id: &str, default_timeframe: &str) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            snapshot: None,
            connection_status: ConnectionStatus::Connecting,
            status_message: "Connecting...".to_string(),
            timeframes: timeframe::all()
                .iter()
                .map(|tf| TimeframeEntry {
                    key: tf.key,
                    label: tf.label,
                    state: HistoryState::NotLoaded,
                })
                .collect(),
            selected: timeframe::position(default_timeframe).unwrap_or(0),
            stats: None,
            chart: None,
            notice: None,
            refreshing: false,
            should_quit: false,
        }
    }

    /// Returns the selected timeframe entry.
    pub fn selected_timeframe(&self) -> &TimeframeEntry {
        &self.timeframes[self.selected]
    }

    /// Key of the timeframe at `index`, if any.
    pub fn timeframe_key(&self, index: usize) -> Option<&'static str> {
        self.timeframes.get(index).map(|tf| tf.key)
    }

    /// Key of the timeframe after the selected one, wrapping around.
    pub fn next_timeframe_key(&self) -> &'static str {
        self.timeframes[(self.selected + 1) % self.timeframes.len()].key
    }

    /// Key of the timeframe before the selected one, wrapping around.
    pub fn previous_timeframe_key(&self) -> &'static str {
        let index = self
            .selected
            .checked_sub(1)
            .unwrap_or(self.timeframes.len() - 1);
        self.timeframes[index].key
    }

    /// Applies a coordinator update.
    pub fn apply(&mut self, event: DisplayEvent) {
        match event {
            DisplayEvent::StatusChanged { state, message } => {
                self.connection_status = match state {
                    ConnectionState::Connected => ConnectionStatus::Connected,
                    ConnectionState::Error => ConnectionStatus::Error,
                };
                self.status_message = message;
            }
            DisplayEvent::SnapshotUpdated(snapshot) => self.snapshot = Some(snapshot),
            DisplayEvent::StatsUpdated {
                timeframe,
                label,
                stats,
            } => {
                self.stats = Some(StatsView {
                    timeframe,
                    label,
                    stats,
                });
            }
            DisplayEvent::HistoryStateChanged { timeframe, state } => {
                if let Some(entry) = self.timeframes.iter_mut().find(|tf| tf.key == timeframe) {
                    entry.state = state;
                }
            }
            DisplayEvent::TimeframeSelected(key) => {
                if let Some(index) = self.timeframes.iter().position(|tf| tf.key == key) {
                    self.selected = index;
                }
            }
        }
    }

    /// Current price, e.g. `$142.37`.
    pub fn price_display(&self) -> Option<String> {
        self.snapshot.as_ref().map(|s| format::usd(s.price))
    }

    /// 24h change, e.g. `+2.50%`.
    pub fn change_display(&self) -> Option<String> {
        self.snapshot
            .as_ref()
            .map(|s| format::percent_change(s.change_pct))
    }

    /// Sets a notice to display.
    pub fn show_notice(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            message: message.into(),
            timestamp: Instant::now(),
        });
    }

    /// Clears notices older than five seconds.
    pub fn clear_stale_notices(&mut self) {
        if let Some(ref notice) = self.notice
            && notice.timestamp.elapsed() > NOTICE_TTL
        {
            self.notice = None;
        }
    }
}

/// A timeframe as shown in the selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeframeEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub state: HistoryState,
}

/// Statistics of the rendered series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsView {
    pub timeframe: String,
    pub label: String,
    pub stats: Result<SeriesStats, StatsUnavailable>,
}

/// API status indicator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Error,
}

impl ConnectionStatus {
    /// Returns a display string for the status.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Connected => "Online",
            ConnectionStatus::Error => "API Error",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Notice with timestamp for auto-clear.
#[derive(Clone, Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub timestamp: Instant,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn starts_on_default_timeframe() {
        let app = App::new("solana", "7d");
        assert_eq!(app.selected_timeframe().key, "7d");
        assert_eq!(app.connection_status, ConnectionStatus::Connecting);
        assert!(app.timeframes.iter().all(|tf| tf.state == HistoryState::NotLoaded));
    }

    #[test]
    fn timeframe_navigation_wraps() {
        let mut app = App::new("solana", "24h");
        assert_eq!(app.previous_timeframe_key(), "90d");
        assert_eq!(app.next_timeframe_key(), "7d");
        app.selected = app.timeframes.len() - 1;
        assert_eq!(app.next_timeframe_key(), "24h");
    }

    #[test]
    fn selection_follows_coordinator() {
        let mut app = App::new("solana", "24h");
        app.apply(DisplayEvent::TimeframeSelected("30d".into()));
        assert_eq!(app.selected_timeframe().key, "30d");

        app.apply(DisplayEvent::TimeframeSelected("nope".into()));
        assert_eq!(app.selected_timeframe().key, "30d");
    }

    #[test]
    fn history_state_is_tracked_per_key() {
        let mut app = App::new("solana", "24h");
        app.apply(DisplayEvent::HistoryStateChanged {
            timeframe: "7d".into(),
            state: HistoryState::Failed("boom".into()),
        });
        assert_eq!(app.timeframes[1].state, HistoryState::Failed("boom".into()));
        assert_eq!(app.timeframes[0].state, HistoryState::NotLoaded);
    }

    #[test]
    fn status_changes() {
        let mut app = App::new("solana", "24h");
        app.apply(DisplayEvent::StatusChanged {
            state: ConnectionState::Error,
            message: "upstream returned status 429".into(),
        });
        assert_eq!(app.connection_status, ConnectionStatus::Error);
        assert_eq!(app.status_message, "upstream returned status 429");
    }

    #[test]
    fn price_display_after_snapshot() {
        let mut app = App::new("solana", "24h");
        assert!(app.price_display().is_none());

        app.apply(DisplayEvent::SnapshotUpdated(Snapshot {
            name: "Solana".into(),
            symbol: "sol".into(),
            price: dec!(1234.5),
            change_pct: dec!(-0.75),
            high_24h: dec!(1300),
            low_24h: dec!(1200),
            volume_24h: dec!(1000000),
            market_cap: dec!(5000000000),
            icon_url: None,
            fetched_at: 0,
        }));
        assert_eq!(app.price_display().as_deref(), Some("$1,234.50"));
        assert_eq!(app.change_display().as_deref(), Some("-0.75%"));
    }

    #[test]
    fn fresh_notice_is_kept() {
        let mut app = App::new("solana", "24h");
        app.show_notice(NoticeKind::Info, "Data refreshed");
        app.clear_stale_notices();
        assert!(app.notice.is_some());
    }
}
