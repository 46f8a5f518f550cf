//! Timestamped price samples.

use rust_decimal::Decimal;

/// A single price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePoint {
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub price: Decimal,
}

impl PricePoint {
    pub fn new(timestamp: i64, price: Decimal) -> Self {
        Self { timestamp, price }
    }
}

/// Splits a series into parallel timestamp and value columns, the shape
/// chart renderers consume.
pub fn columns(points: &[PricePoint]) -> (Vec<i64>, Vec<Decimal>) {
    points.iter().map(|p| (p.timestamp, p.price)).unzip()
}
