//! UI actions reach the coordinator in the order they were dispatched.

mod common;

use std::time::Duration;

use common::{Journal, MockFetcher, monitor_config, series};
use solwatch::config::HistoryMode;
use solwatch::coordinator::RefreshCoordinator;
use solwatch::sink::{DisplayEvent, UiSink};
use solwatch::tui::event::{self, Action};
use solwatch::tui::Message;
use tokio::sync::mpsc;

async fn next_selection(rx: &mut mpsc::UnboundedReceiver<Message>) -> String {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no selection within 5s")
            .expect("UI channel closed");
        if let Message::Display(DisplayEvent::TimeframeSelected(key)) = message {
            return key;
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rapid_selections_settle_on_last_choice() {
    let fetcher = MockFetcher::new(&Journal::default());
    for key in ["24h", "7d", "30d", "90d"] {
        fetcher.set_history(key, Ok(series(&[(1000, "100"), (2000, "101")])));
    }
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sink = UiSink::new(tx.clone());
    let coordinator = RefreshCoordinator::new(
        fetcher,
        sink.clone(),
        sink,
        monitor_config(HistoryMode::Timeframes),
    )
    .unwrap();
    let (handle, task) = coordinator.spawn();

    for _ in 0..500 {
        event::dispatch(Action::SelectTimeframe("7d"), &handle, &tx);
        event::dispatch(Action::SelectTimeframe("30d"), &handle, &tx);

        assert_eq!(next_selection(&mut rx).await, "7d");
        assert_eq!(next_selection(&mut rx).await, "30d");
    }

    drop(handle);
    task.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_dispatch_to_stopped_coordinator_reports_failure() {
    let fetcher = MockFetcher::new(&Journal::default());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sink = UiSink::new(tx.clone());
    let coordinator = RefreshCoordinator::new(
        fetcher,
        sink.clone(),
        sink,
        monitor_config(HistoryMode::Timeframes),
    )
    .unwrap();
    let (handle, task) = coordinator.spawn();
    task.abort();
    let _ = task.await;

    event::dispatch(Action::ManualRefresh, &handle, &tx);

    let message = loop {
        let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no reply within 5s")
            .expect("UI channel closed");
        if matches!(message, Message::RefreshFinished(_)) {
            break message;
        }
    };
    assert!(matches!(
        message,
        Message::RefreshFinished(Err(solwatch::SolwatchError::ChannelClosed))
    ));
}
