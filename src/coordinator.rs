//! Refresh orchestration.
//!
//! [`RefreshCoordinator`] owns the history store, the live series, the
//! timeframe selection and the snapshot status. It decides what to fetch
//! and when, writes results into the store and pushes the affected chart
//! series and display updates to its sinks.
//!
//! At runtime the coordinator is moved into a single task by
//! [`RefreshCoordinator::spawn`]; the poll timer and every UI request are
//! serialized through that task, so state is never shared or locked.

use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::{HistoryMode, MonitorConfig};
use crate::fetcher::PriceFetcher;
use crate::models::{PricePoint, Snapshot, price};
use crate::sink::{ChartSink, ConnectionState, DisplayEvent, DisplaySink, HistoryState};
use crate::stats;
use crate::store::{HistoryStore, LiveSeries};
use crate::timeframe::{self, TimeframeConfig};
use crate::{Result, SolwatchError};

/// Lifecycle of the snapshot feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnapshotStatus {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Error,
}

/// Requests sent to a running coordinator.
#[derive(Debug)]
pub enum Command {
    /// Refresh the snapshot now and report the outcome.
    ManualRefresh {
        reply: oneshot::Sender<Result<Snapshot>>,
    },
    /// Select a timeframe, fetching its history if it was never loaded.
    SelectTimeframe {
        key: String,
        reply: oneshot::Sender<Result<()>>,
    },
    /// The UI came back to the foreground.
    VisibilityRestored { reply: oneshot::Sender<Result<()>> },
}

/// Cloneable sender side of a spawned coordinator.
///
/// The `begin_*` methods enqueue their command before returning, so
/// requests issued from one task reach the coordinator in call order even
/// when their replies are awaited on separate tasks.
#[derive(Clone, Debug)]
pub struct CoordinatorHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl CoordinatorHandle {
    /// Triggers a snapshot refresh and waits for its result.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, or [`SolwatchError::ChannelClosed`] if the
    /// coordinator has stopped.
    pub async fn manual_refresh(&self) -> Result<Snapshot> {
        self.begin_manual_refresh()?.outcome().await
    }

    /// Switches the displayed timeframe.
    ///
    /// # Errors
    ///
    /// Returns [`SolwatchError::UnknownTimeframe`], the history fetch error,
    /// or [`SolwatchError::ChannelClosed`].
    pub async fn select_timeframe(&self, key: &str) -> Result<()> {
        self.begin_select_timeframe(key)?.outcome().await
    }

    /// Catches up after the UI regained visibility.
    ///
    /// # Errors
    ///
    /// Returns the first fetch error, or [`SolwatchError::ChannelClosed`].
    pub async fn visibility_restored(&self) -> Result<()> {
        self.begin_visibility_restored()?.outcome().await
    }

    /// Enqueues a manual refresh.
    ///
    /// # Errors
    ///
    /// Returns [`SolwatchError::ChannelClosed`] if the coordinator has stopped.
    pub fn begin_manual_refresh(&self) -> Result<Pending<Snapshot>> {
        self.enqueue(|reply| Command::ManualRefresh { reply })
    }

    /// Enqueues a timeframe switch.
    ///
    /// # Errors
    ///
    /// Returns [`SolwatchError::ChannelClosed`] if the coordinator has stopped.
    pub fn begin_select_timeframe(&self, key: &str) -> Result<Pending<()>> {
        let key = key.to_string();
        self.enqueue(|reply| Command::SelectTimeframe { key, reply })
    }

    /// Enqueues a visibility refresh.
    ///
    /// # Errors
    ///
    /// Returns [`SolwatchError::ChannelClosed`] if the coordinator has stopped.
    pub fn begin_visibility_restored(&self) -> Result<Pending<()>> {
        self.enqueue(|reply| Command::VisibilityRestored { reply })
    }

    fn enqueue<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Result<Pending<T>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(command(reply))
            .map_err(|_| SolwatchError::ChannelClosed)?;
        Ok(Pending { rx })
    }
}

/// Reply to a command that has already been queued.
#[derive(Debug)]
pub struct Pending<T> {
    rx: oneshot::Receiver<Result<T>>,
}

impl<T> Pending<T> {
    /// Waits for the coordinator to finish the command.
    ///
    /// # Errors
    ///
    /// Returns the command's error, or [`SolwatchError::ChannelClosed`] if
    /// the coordinator stopped before answering.
    pub async fn outcome(self) -> Result<T> {
        self.rx.await.map_err(|_| SolwatchError::ChannelClosed)?
    }
}

/// The refresh state machine.
pub struct RefreshCoordinator<F, C, D> {
    fetcher: F,
    chart: C,
    display: D,
    config: MonitorConfig,
    store: HistoryStore,
    live: LiveSeries,
    current: &'static TimeframeConfig,
    status: SnapshotStatus,
    ticks_since_history_refresh: u64,
}

impl<F, C, D> RefreshCoordinator<F, C, D>
where
    F: PriceFetcher + 'static,
    C: ChartSink + 'static,
    D: DisplaySink + 'static,
{
    /// Creates a coordinator with nothing loaded.
    ///
    /// # Errors
    ///
    /// Returns [`SolwatchError::UnknownTimeframe`] if the configured default
    /// timeframe is not registered.
    pub fn new(fetcher: F, chart: C, display: D, config: MonitorConfig) -> Result<Self> {
        let current = timeframe::lookup(&config.default_timeframe)
            .ok_or_else(|| SolwatchError::UnknownTimeframe(config.default_timeframe.clone()))?;

        Ok(Self {
            fetcher,
            chart,
            display,
            live: LiveSeries::new(config.max_live_points),
            config,
            store: HistoryStore::new(),
            current,
            status: SnapshotStatus::Uninitialized,
            ticks_since_history_refresh: 0,
        })
    }

    pub fn status(&self) -> SnapshotStatus {
        self.status
    }

    pub fn current_timeframe(&self) -> &'static TimeframeConfig {
        self.current
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn live_series(&self) -> &LiveSeries {
        &self.live
    }

    /// Initial load: the snapshot first, then every timeframe in order
    /// (or only the selected one in live mode). Failures are logged per
    /// step and never stop the remaining steps.
    pub async fn bootstrap(&mut self) {
        info!(asset = %self.config.asset_id, mode = ?self.config.history_mode, "Bootstrapping");
        self.status = SnapshotStatus::Loading;

        if let Err(e) = self.refresh_snapshot().await {
            warn!(error = %e, "Initial snapshot fetch failed");
        }

        let timeframes: Vec<&'static TimeframeConfig> = match self.config.history_mode {
            HistoryMode::Timeframes => timeframe::all().iter().collect(),
            HistoryMode::Live => vec![self.current],
        };
        for tf in timeframes {
            if let Err(e) = self.refresh_history(tf).await {
                warn!(timeframe = tf.key, error = %e, "Initial history fetch failed");
            }
        }

        self.render_current();
    }

    /// Fetches the snapshot and publishes it.
    ///
    /// In live mode the price is also appended to the live series and the
    /// chart is redrawn.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after moving the status to
    /// [`SnapshotStatus::Error`].
    pub async fn refresh_snapshot(&mut self) -> Result<Snapshot> {
        debug!("Fetching snapshot");
        let result = with_timeout(
            self.config.fetch_timeout,
            self.fetcher.fetch_snapshot(&self.config.asset_id),
        )
        .await;

        match result {
            Ok(snapshot) => {
                self.status = SnapshotStatus::Ready;
                self.display
                    .emit(DisplayEvent::SnapshotUpdated(snapshot.clone()));
                self.display.emit(DisplayEvent::StatusChanged {
                    state: ConnectionState::Connected,
                    message: "Connected".to_string(),
                });
                info!(price = %snapshot.price, change_pct = %snapshot.change_pct, "Snapshot updated");

                if self.config.history_mode == HistoryMode::Live {
                    self.live
                        .append(PricePoint::new(snapshot.fetched_at, snapshot.price));
                    self.render_current();
                }
                Ok(snapshot)
            }
            Err(e) => {
                self.status = SnapshotStatus::Error;
                self.display.emit(DisplayEvent::StatusChanged {
                    state: ConnectionState::Error,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Selects `key`. Cached history is rendered immediately; a timeframe
    /// that was never loaded is fetched first.
    ///
    /// # Errors
    ///
    /// Returns [`SolwatchError::UnknownTimeframe`] without changing the
    /// selection, or the history fetch error (the selection still changes
    /// and the empty series is rendered).
    pub async fn switch_timeframe(&mut self, key: &str) -> Result<()> {
        let tf = timeframe::lookup(key)
            .ok_or_else(|| SolwatchError::UnknownTimeframe(key.to_string()))?;

        info!(timeframe = tf.key, "Timeframe selected");
        self.current = tf;
        self.display
            .emit(DisplayEvent::TimeframeSelected(tf.key.to_string()));

        let fetched = if self.store.is_loaded(tf.key) {
            debug!(timeframe = tf.key, "Rendering cached history");
            if self.config.history_mode == HistoryMode::Live {
                self.live.reset(self.store.get(tf.key).to_vec());
            }
            Ok(())
        } else {
            self.refresh_history(tf).await
        };

        self.render_current();
        fetched
    }

    /// Timer entry point. Always refreshes the snapshot; refreshes the
    /// selected timeframe's history once the history refresh interval has
    /// elapsed in poll ticks. Never fails.
    pub async fn periodic_tick(&mut self) {
        debug!("Poll tick");
        if let Err(e) = self.refresh_snapshot().await {
            warn!(error = %e, "Periodic snapshot refresh failed");
        }

        self.ticks_since_history_refresh += 1;
        if !self.history_refresh_due() {
            return;
        }
        self.ticks_since_history_refresh = 0;

        // The live series is extended by snapshots; reseeding would drop them.
        if self.config.history_mode == HistoryMode::Live {
            return;
        }

        let tf = self.current;
        match self.refresh_history(tf).await {
            Ok(()) => self.render_current(),
            Err(e) => warn!(timeframe = tf.key, error = %e, "Periodic history refresh failed"),
        }
    }

    /// Foreground catch-up: refreshes the snapshot and the selected
    /// timeframe's history unconditionally.
    ///
    /// # Errors
    ///
    /// Returns the snapshot error if any, otherwise the history error.
    pub async fn on_visible(&mut self) -> Result<()> {
        info!("Visibility restored, refreshing");
        let snapshot = self.refresh_snapshot().await;

        let tf = self.current;
        let history = self.refresh_history(tf).await;
        if let Err(e) = &history {
            warn!(timeframe = tf.key, error = %e, "History refresh after visibility failed");
        }

        self.ticks_since_history_refresh = 0;
        self.render_current();
        snapshot.map(|_| ()).and(history)
    }

    /// Fetches one timeframe's history into the store.
    ///
    /// Requests are handled one at a time, so a fetch never starts while
    /// another is outstanding. In live mode a result for the selected
    /// timeframe also reseeds the live series.
    async fn refresh_history(&mut self, tf: &'static TimeframeConfig) -> Result<()> {
        let ticket = self.store.begin_fetch(tf.key);
        self.set_history_state(tf, HistoryState::Loading);
        debug!(timeframe = tf.key, generation = ticket.generation(), "Fetching history");

        let result = with_timeout(
            self.config.fetch_timeout,
            self.fetcher
                .fetch_history(&self.config.asset_id, tf.lookback_days, tf.granularity),
        )
        .await;

        match result {
            Ok(points) => {
                let count = points.len();
                let seed = (self.config.history_mode == HistoryMode::Live
                    && tf.key == self.current.key)
                    .then(|| points.clone());

                if !self.store.complete_fetch(&ticket, points) {
                    debug!(timeframe = tf.key, "Discarding superseded history result");
                    return Ok(());
                }
                if let Some(seed) = seed {
                    self.live.reset(seed);
                }

                info!(timeframe = tf.key, points = count, "History updated");
                let state = if count == 0 {
                    HistoryState::NotLoaded
                } else {
                    HistoryState::Loaded
                };
                self.set_history_state(tf, state);
                Ok(())
            }
            Err(e) => {
                self.set_history_state(tf, HistoryState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Pushes the selected series to the chart and its stats to the display.
    fn render_current(&mut self) {
        let tf = self.current;
        let series = match self.config.history_mode {
            HistoryMode::Timeframes => self.store.get(tf.key).to_vec(),
            HistoryMode::Live => self.live.to_vec(),
        };

        let (timestamps, values) = price::columns(&series);
        self.chart.render(&timestamps, &values, tf.axis_unit);
        self.display.emit(DisplayEvent::StatsUpdated {
            timeframe: tf.key.to_string(),
            label: tf.label.to_string(),
            stats: stats::project(&series),
        });
    }

    fn set_history_state(&mut self, tf: &TimeframeConfig, state: HistoryState) {
        self.display.emit(DisplayEvent::HistoryStateChanged {
            timeframe: tf.key.to_string(),
            state,
        });
    }

    fn history_refresh_due(&self) -> bool {
        let elapsed_ms =
            self.config.poll_interval.as_millis() * u128::from(self.ticks_since_history_refresh);
        elapsed_ms >= self.config.history_refresh_interval.as_millis()
    }

    /// Runs the initial load, then serves the poll timer and `commands`
    /// until every sender is dropped.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        self.bootstrap().await;

        let period = self.config.poll_interval;
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => self.periodic_tick().await,
                command = commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => {
                        info!("Command channel closed, stopping coordinator");
                        break;
                    }
                },
            }
        }
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::ManualRefresh { reply } => {
                let result = self.refresh_snapshot().await;
                if let Err(e) = &result {
                    warn!(error = %e, "Manual refresh failed");
                }
                let _ = reply.send(result);
            }
            Command::SelectTimeframe { key, reply } => {
                let result = self.switch_timeframe(&key).await;
                let _ = reply.send(result);
            }
            Command::VisibilityRestored { reply } => {
                let result = self.on_visible().await;
                let _ = reply.send(result);
            }
        }
    }

    /// Moves the coordinator onto its own task.
    pub fn spawn(self) -> (CoordinatorHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(rx));
        (CoordinatorHandle { tx }, task)
    }
}

/// Bounds `fut` by `timeout`, mapping expiry to [`SolwatchError::Timeout`].
async fn with_timeout<T>(timeout: Duration, fut: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| SolwatchError::Timeout {
            after_ms: timeout.as_millis() as u64,
        })?
}
