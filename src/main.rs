use std::fs::File;
use std::sync::Mutex;

use solwatch::config::{LogConfig, fetch_config};
use solwatch::coordinator::{CoordinatorHandle, RefreshCoordinator};
use solwatch::fetcher::CoinGeckoFetcher;
use solwatch::sink::UiSink;
use solwatch::tui::{self, App, event};
use solwatch::{Result, SolwatchError};
use tokio::sync::mpsc;
use tracing::{error, info};

/// UI tick used to expire notices.
const UI_TICK_MS: u64 = 250;

#[tokio::main]
async fn main() -> Result<()> {
    let app_config = fetch_config()?;
    init_logging(&app_config.logging)?;

    let monitor = app_config.monitor;
    info!(asset = %monitor.asset_id, api = %monitor.api_url, mode = ?monitor.history_mode, "Starting monitor");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let sink = UiSink::new(tx.clone());
    let fetcher = CoinGeckoFetcher::new(&monitor.api_url)?;
    let mut app = App::new(&monitor.asset_id, &monitor.default_timeframe);
    let coordinator = RefreshCoordinator::new(fetcher, sink.clone(), sink, monitor)?;

    let mut terminal = tui::setup_terminal()?;
    let (handle, coordinator_task) = coordinator.spawn();
    event::spawn_event_reader(tx.clone());
    event::spawn_tick_timer(tx.clone(), UI_TICK_MS);

    let outcome = run_loop(&mut terminal, &mut app, &handle, &tx, &mut rx).await;

    coordinator_task.abort();
    tui::restore_terminal(&mut terminal)?;
    if let Err(e) = &outcome {
        error!(error = %e, "Monitor stopped with an error");
    }
    info!("Monitor stopped");
    outcome
}

async fn run_loop(
    terminal: &mut tui::Tui,
    app: &mut App,
    handle: &CoordinatorHandle,
    tx: &mpsc::UnboundedSender<tui::Message>,
    rx: &mut mpsc::UnboundedReceiver<tui::Message>,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| tui::render(frame, app))
            .map_err(|e| SolwatchError::Io(format!("failed to draw frame: {e}")))?;

        let Some(message) = rx.recv().await else {
            return Err(SolwatchError::ChannelClosed);
        };
        if let Some(action) = event::update(app, message) {
            event::dispatch(action, handle, tx);
        }
        // Apply everything already queued before the next redraw.
        while let Ok(message) = rx.try_recv() {
            if let Some(action) = event::update(app, message) {
                event::dispatch(action, handle, tx);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Sends log output to a file so it does not corrupt the terminal UI.
fn init_logging(config: &LogConfig) -> Result<()> {
    let file = File::create(&config.file).map_err(|e| {
        SolwatchError::Io(format!("failed to create log file {}: {e}", config.file))
    })?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(config.level)
        .init();
    Ok(())
}
