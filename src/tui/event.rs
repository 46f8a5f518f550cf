//! Event handling for the TUI.

use std::future::Future;
use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::SolwatchError;
use crate::coordinator::{CoordinatorHandle, Pending};
use crate::sink::{ChartSeries, DisplayEvent};

use super::app::{App, NoticeKind};

/// Events that can occur in the terminal.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// The terminal window regained focus.
    FocusGained,
    /// Periodic tick for UI updates.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),
    /// Status, snapshot, stats or selection update from the coordinator.
    Display(DisplayEvent),
    /// New chart series from the coordinator.
    Chart(ChartSeries),
    /// Outcome of a manual refresh.
    RefreshFinished(Result<(), SolwatchError>),
    /// A timeframe switch or visibility refresh failed.
    ActionFailed {
        action: &'static str,
        error: SolwatchError,
    },
}

/// Requests that must be forwarded to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ManualRefresh,
    SelectTimeframe(&'static str),
    VisibilityRestored,
}

/// Spawns a task that reads terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        let mut events = EventStream::new();
        while let Some(event) = events.next().await {
            let message = match event {
                Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    Message::Input(Event::Key(key))
                }
                Ok(CrosstermEvent::Resize(w, h)) => Message::Input(Event::Resize(w, h)),
                Ok(CrosstermEvent::FocusGained) => Message::Input(Event::FocusGained),
                Ok(_) => continue,
                Err(e) => {
                    warn!(error = %e, "Terminal event stream failed");
                    break;
                }
            };
            if tx.send(message).is_err() {
                break;
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Forwards `action` to the coordinator and reports the outcome back
/// through `tx`.
///
/// The command is enqueued before this returns, so actions reach the
/// coordinator in the order they were dispatched; only the reply is
/// awaited on a separate task.
pub fn dispatch(action: Action, handle: &CoordinatorHandle, tx: &mpsc::UnboundedSender<Message>) {
    debug!(?action, "Dispatching action");
    match action {
        Action::ManualRefresh => {
            let pending = handle.begin_manual_refresh();
            report(tx, async move {
                Some(Message::RefreshFinished(settle(pending).await.map(|_| ())))
            });
        }
        Action::SelectTimeframe(key) => {
            let pending = handle.begin_select_timeframe(key);
            report(tx, async move { failure("timeframe switch", settle(pending).await) });
        }
        Action::VisibilityRestored => {
            let pending = handle.begin_visibility_restored();
            report(tx, async move { failure("refresh", settle(pending).await) });
        }
    }
}

async fn settle<T>(pending: Result<Pending<T>, SolwatchError>) -> Result<T, SolwatchError> {
    pending?.outcome().await
}

fn failure(action: &'static str, result: Result<(), SolwatchError>) -> Option<Message> {
    result.err().map(|error| Message::ActionFailed { action, error })
}

/// Awaits `outcome` on its own task and sends any resulting message.
fn report<F>(tx: &mpsc::UnboundedSender<Message>, outcome: F)
where
    F: Future<Output = Option<Message>> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        if let Some(message) = outcome.await {
            let _ = tx.send(message);
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),
        Message::Display(event) => {
            app.apply(event);
            None
        }
        Message::Chart(series) => {
            app.chart = Some(series);
            None
        }
        Message::RefreshFinished(result) => {
            app.refreshing = false;
            match result {
                Ok(()) => app.show_notice(NoticeKind::Info, "Data refreshed successfully"),
                Err(e) => app.show_notice(NoticeKind::Error, format!("Refresh failed: {e}")),
            }
            None
        }
        Message::ActionFailed { action, error } => {
            app.show_notice(NoticeKind::Error, format!("{action} failed: {error}"));
            None
        }
    }
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(_, _) => None,
        Event::FocusGained => Some(Action::VisibilityRestored),
        Event::Tick => {
            app.clear_stale_notices();
            None
        }
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            None
        }

        // Manual refresh, one at a time
        KeyCode::Char('r') => {
            if app.refreshing {
                return None;
            }
            app.refreshing = true;
            Some(Action::ManualRefresh)
        }

        // Timeframe shortcuts
        KeyCode::Char(c @ '1'..='9') => {
            let index = c.to_digit(10)? as usize - 1;
            app.timeframe_key(index).map(Action::SelectTimeframe)
        }
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
            Some(Action::SelectTimeframe(app.next_timeframe_key()))
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
            Some(Action::SelectTimeframe(app.previous_timeframe_key()))
        }

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn key(code: KeyCode) -> Message {
        Message::Input(Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }))
    }

    #[test]
    fn refresh_key_is_debounced_until_finished() {
        let mut app = App::new("solana", "24h");
        assert_eq!(update(&mut app, key(KeyCode::Char('r'))), Some(Action::ManualRefresh));
        assert_eq!(update(&mut app, key(KeyCode::Char('r'))), None);

        update(&mut app, Message::RefreshFinished(Ok(())));
        assert!(!app.refreshing);
        assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Info));
        assert_eq!(update(&mut app, key(KeyCode::Char('r'))), Some(Action::ManualRefresh));
    }

    #[test]
    fn failed_refresh_shows_error_notice() {
        let mut app = App::new("solana", "24h");
        update(&mut app, key(KeyCode::Char('r')));
        update(
            &mut app,
            Message::RefreshFinished(Err(SolwatchError::UpstreamStatus { code: 503 })),
        );
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "Refresh failed: upstream returned status 503");
    }

    #[test]
    fn digit_keys_select_timeframes() {
        let mut app = App::new("solana", "24h");
        assert_eq!(
            update(&mut app, key(KeyCode::Char('2'))),
            Some(Action::SelectTimeframe("7d"))
        );
        assert_eq!(update(&mut app, key(KeyCode::Char('9'))), None);
        // selection changes only once the coordinator confirms it
        assert_eq!(app.selected_timeframe().key, "24h");
    }

    #[test]
    fn arrows_cycle_timeframes() {
        let mut app = App::new("solana", "24h");
        assert_eq!(
            update(&mut app, key(KeyCode::Left)),
            Some(Action::SelectTimeframe("90d"))
        );
        assert_eq!(
            update(&mut app, key(KeyCode::Right)),
            Some(Action::SelectTimeframe("7d"))
        );
    }

    #[test]
    fn focus_gained_requests_visibility_refresh() {
        let mut app = App::new("solana", "24h");
        assert_eq!(
            update(&mut app, Message::Input(Event::FocusGained)),
            Some(Action::VisibilityRestored)
        );
    }

    #[test]
    fn quit_key() {
        let mut app = App::new("solana", "24h");
        update(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
