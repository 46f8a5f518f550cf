//! Summary statistics over a price series.

use rust_decimal::Decimal;

use crate::models::PricePoint;

/// Min/max and first-to-last change of a series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeriesStats {
    pub min: Decimal,
    pub max: Decimal,
    pub first: Decimal,
    pub last: Decimal,
    /// `(last - first) / first * 100`.
    pub change_pct: Decimal,
}

/// Why statistics could not be derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatsUnavailable {
    EmptySeries,
    /// The first sample is zero, so the percent change is undefined.
    ZeroBaseline,
}

/// Computes [`SeriesStats`] for `points`.
///
/// # Errors
///
/// Returns [`StatsUnavailable`] for an empty series or a zero first price.
pub fn project(points: &[PricePoint]) -> Result<SeriesStats, StatsUnavailable> {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first.price, last.price),
        _ => return Err(StatsUnavailable::EmptySeries),
    };
    if first.is_zero() {
        return Err(StatsUnavailable::ZeroBaseline);
    }

    let (min, max) = points
        .iter()
        .fold((first, first), |(min, max), p| (min.min(p.price), max.max(p.price)));

    Ok(SeriesStats {
        min,
        max,
        first,
        last,
        change_pct: (last - first) / first * Decimal::ONE_HUNDRED,
    })
}
