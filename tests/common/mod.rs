//! Shared test utilities: a scripted fetcher and recording sinks.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use solwatch::config::{HistoryMode, MonitorConfig};
use solwatch::fetcher::PriceFetcher;
use solwatch::models::{PricePoint, Snapshot};
use solwatch::sink::{ChartSink, DisplayEvent, DisplaySink};
use solwatch::timeframe::{self, AxisUnit, SampleGranularity};
use solwatch::{Result, SolwatchError};

/// Something observable that happened during a test, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    SnapshotFetch,
    HistoryFetch(&'static str),
    Render { points: usize, axis_unit: AxisUnit },
    Display(DisplayEvent),
}

/// Ordered record shared by the mock fetcher and the sinks.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Entry>>>);

impl Journal {
    fn push(&self, entry: Entry) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    pub fn history_fetches(&self) -> Vec<&'static str> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::HistoryFetch(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn snapshot_fetches(&self) -> usize {
        self.entries()
            .iter()
            .filter(|e| matches!(e, Entry::SnapshotFetch))
            .count()
    }

    pub fn renders(&self) -> Vec<usize> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Render { points, .. } => Some(points),
                _ => None,
            })
            .collect()
    }

    pub fn display_events(&self) -> Vec<DisplayEvent> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Display(event) => Some(event),
                _ => None,
            })
            .collect()
    }
}

#[derive(Default)]
struct Script {
    snapshot: Option<Result<Snapshot>>,
    history: HashMap<&'static str, Result<Vec<PricePoint>>>,
    delay: Option<Duration>,
}

/// Fetcher returning canned results. Timeframes without a scripted result
/// answer with an empty series.
#[derive(Clone, Default)]
pub struct MockFetcher {
    script: Arc<Mutex<Script>>,
    journal: Journal,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

/// Counts a call as outstanding until dropped, including when a timeout
/// abandons it.
struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockFetcher {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            ..Self::default()
        }
    }

    /// Highest number of calls that were outstanding at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn enter(&self) -> InFlight {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlight(self.in_flight.clone())
    }

    pub fn set_snapshot(&self, result: Result<Snapshot>) {
        self.script.lock().unwrap().snapshot = Some(result);
    }

    pub fn set_history(&self, key: &'static str, result: Result<Vec<PricePoint>>) {
        self.script.lock().unwrap().history.insert(key, result);
    }

    /// Makes every call sleep for `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        self.script.lock().unwrap().delay = Some(delay);
    }

    fn key_for(lookback_days: u32, granularity: SampleGranularity) -> &'static str {
        timeframe::all()
            .iter()
            .find(|tf| tf.lookback_days == lookback_days && tf.granularity == granularity)
            .map(|tf| tf.key)
            .expect("history requested for an unregistered timeframe")
    }

    async fn pause(&self) {
        let delay = self.script.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl PriceFetcher for MockFetcher {
    async fn fetch_snapshot(&self, _asset_id: &str) -> Result<Snapshot> {
        self.journal.push(Entry::SnapshotFetch);
        let _in_flight = self.enter();
        self.pause().await;
        self.script
            .lock()
            .unwrap()
            .snapshot
            .clone()
            .unwrap_or_else(|| Ok(snapshot(dec_price("100"))))
    }

    async fn fetch_history(
        &self,
        _asset_id: &str,
        lookback_days: u32,
        granularity: SampleGranularity,
    ) -> Result<Vec<PricePoint>> {
        let key = Self::key_for(lookback_days, granularity);
        self.journal.push(Entry::HistoryFetch(key));
        let _in_flight = self.enter();
        self.pause().await;
        self.script
            .lock()
            .unwrap()
            .history
            .get(key)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Chart sink writing into the journal.
#[derive(Clone)]
pub struct RecordingChart(pub Journal);

impl ChartSink for RecordingChart {
    fn render(&mut self, timestamps: &[i64], values: &[Decimal], axis_unit: AxisUnit) {
        assert_eq!(timestamps.len(), values.len(), "chart columns must align");
        self.0.push(Entry::Render {
            points: timestamps.len(),
            axis_unit,
        });
    }
}

/// Display sink writing into the journal.
#[derive(Clone)]
pub struct RecordingDisplay(pub Journal);

impl DisplaySink for RecordingDisplay {
    fn emit(&mut self, event: DisplayEvent) {
        self.0.push(Entry::Display(event));
    }
}

pub fn dec_price(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn snapshot(price: Decimal) -> Snapshot {
    Snapshot {
        name: "Solana".to_string(),
        symbol: "sol".to_string(),
        price,
        change_pct: dec_price("2.5"),
        high_24h: dec_price("105"),
        low_24h: dec_price("95"),
        volume_24h: dec_price("2350000000"),
        market_cap: dec_price("67000000000"),
        icon_url: None,
        fetched_at: 1_705_322_096_000,
    }
}

/// Builds a series from `(timestamp_ms, price)` pairs.
pub fn series(points: &[(i64, &str)]) -> Vec<PricePoint> {
    points
        .iter()
        .map(|(ts, price)| PricePoint::new(*ts, dec_price(price)))
        .collect()
}

pub fn monitor_config(mode: HistoryMode) -> MonitorConfig {
    MonitorConfig {
        history_mode: mode,
        poll_interval: Duration::from_millis(30_000),
        history_refresh_interval: Duration::from_millis(90_000),
        fetch_timeout: Duration::from_millis(200),
        ..MonitorConfig::default()
    }
}

pub fn network_error() -> SolwatchError {
    SolwatchError::Network("connection refused".to_string())
}
