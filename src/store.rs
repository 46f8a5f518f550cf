//! In-memory price history.
//!
//! [`HistoryStore`] keeps one series per timeframe key, replaced wholesale
//! on every fetch. [`LiveSeries`] is the bounded rolling window fed by
//! snapshot polling.

use std::collections::{HashMap, VecDeque};

use crate::models::PricePoint;

/// Default cap of the live series.
pub const DEFAULT_MAX_LIVE_POINTS: usize = 100;

/// Identifies one issued history fetch for a key.
///
/// Only the most recently issued ticket for a key may write its result;
/// completions carrying an older generation are discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    key: String,
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Per-timeframe history series.
///
/// A key is present only after at least one successful write; an empty
/// result from [`get`](Self::get) means the timeframe must be fetched
/// before it can be displayed.
#[derive(Debug, Default)]
pub struct HistoryStore {
    series: HashMap<String, Vec<PricePoint>>,
    issued: HashMap<String, u64>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the series for `key`. No merge with prior data.
    pub fn replace(&mut self, key: &str, points: Vec<PricePoint>) {
        self.series.insert(key.to_string(), points);
    }

    /// Returns the series for `key`, or an empty slice if never loaded.
    pub fn get(&self, key: &str) -> &[PricePoint] {
        self.series.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if `key` holds a non-empty series.
    pub fn is_loaded(&self, key: &str) -> bool {
        !self.get(key).is_empty()
    }

    /// Issues a new generation for `key`.
    pub fn begin_fetch(&mut self, key: &str) -> FetchTicket {
        let generation = self.issued.entry(key.to_string()).or_insert(0);
        *generation += 1;
        FetchTicket {
            key: key.to_string(),
            generation: *generation,
        }
    }

    /// Applies a fetch result if `ticket` is still the latest for its key.
    ///
    /// Returns `false` when the result was stale and discarded.
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, points: Vec<PricePoint>) -> bool {
        if !self.is_latest(ticket) {
            return false;
        }
        self.replace(&ticket.key, points);
        true
    }

    fn is_latest(&self, ticket: &FetchTicket) -> bool {
        self.issued.get(&ticket.key) == Some(&ticket.generation)
    }
}

/// Bounded FIFO of the most recent price samples.
#[derive(Debug, Clone)]
pub struct LiveSeries {
    points: VecDeque<PricePoint>,
    cap: usize,
}

impl LiveSeries {
    /// Creates an empty series holding at most `cap` points (minimum 1).
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            points: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Pushes `point`, evicting the oldest entries beyond the cap.
    pub fn append(&mut self, point: PricePoint) {
        self.points.push_back(point);
        while self.points.len() > self.cap {
            self.points.pop_front();
        }
    }

    /// Replaces the contents with the newest `cap` entries of `points`.
    pub fn reset(&mut self, points: Vec<PricePoint>) {
        let skip = points.len().saturating_sub(self.cap);
        self.points = points.into_iter().skip(skip).collect();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Copies the series out in insertion order.
    pub fn to_vec(&self) -> Vec<PricePoint> {
        self.points.iter().copied().collect()
    }
}

impl Default for LiveSeries {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LIVE_POINTS)
    }
}
