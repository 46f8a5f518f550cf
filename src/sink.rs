//! Output contracts of the refresh coordinator.
//!
//! The coordinator never touches the terminal directly. It pushes chart
//! series through a [`ChartSink`] and status/price/stats changes through a
//! [`DisplaySink`]; [`UiSink`] forwards both into the TUI message channel.

use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::debug;

use crate::models::Snapshot;
use crate::stats::{SeriesStats, StatsUnavailable};
use crate::timeframe::AxisUnit;
use crate::tui::Message;

/// Receives a full chart series. Each call replaces the previous one.
pub trait ChartSink: Send {
    fn render(&mut self, timestamps: &[i64], values: &[Decimal], axis_unit: AxisUnit);
}

/// Receives discrete display updates.
pub trait DisplaySink: Send {
    fn emit(&mut self, event: DisplayEvent);
}

/// A series ready for plotting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartSeries {
    pub timestamps: Vec<i64>,
    pub values: Vec<Decimal>,
    pub axis_unit: AxisUnit,
}

/// API connectivity as shown by the status indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Error,
}

/// Load state of one timeframe's history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryState {
    NotLoaded,
    Loading,
    Loaded,
    Failed(String),
}

/// Updates published by the coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayEvent {
    StatusChanged {
        state: ConnectionState,
        message: String,
    },
    SnapshotUpdated(Snapshot),
    StatsUpdated {
        timeframe: String,
        label: String,
        stats: Result<SeriesStats, StatsUnavailable>,
    },
    HistoryStateChanged {
        timeframe: String,
        state: HistoryState,
    },
    TimeframeSelected(String),
}

/// Sink that forwards everything to the TUI event loop.
#[derive(Clone, Debug)]
pub struct UiSink {
    tx: mpsc::UnboundedSender<Message>,
}

impl UiSink {
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { tx }
    }

    fn send(&self, message: Message) {
        // The UI only goes away on shutdown.
        if self.tx.send(message).is_err() {
            debug!("UI channel closed, dropping update");
        }
    }
}

impl ChartSink for UiSink {
    fn render(&mut self, timestamps: &[i64], values: &[Decimal], axis_unit: AxisUnit) {
        self.send(Message::Chart(ChartSeries {
            timestamps: timestamps.to_vec(),
            values: values.to_vec(),
            axis_unit,
        }));
    }
}

impl DisplaySink for UiSink {
    fn emit(&mut self, event: DisplayEvent) {
        self.send(Message::Display(event));
    }
}
