//! CoinGecko v3 response shapes.
//!
//! Only the fields the monitor reads are modelled; everything else in the
//! payload is ignored. Optional fields are kept optional here and checked
//! during conversion so a missing value becomes a
//! [`MalformedPayload`](crate::SolwatchError::MalformedPayload) error
//! instead of a generic decode failure.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use super::price::PricePoint;
use crate::{Result, SolwatchError};

/// Response of `GET /coins/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    pub image: Option<CoinImage>,
    pub market_data: Option<MarketData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinImage {
    pub large: Option<String>,
}

/// The `market_data` object. Currency maps are reduced to their USD entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub current_price: UsdValue,
    pub price_change_percentage_24h: Option<Decimal>,
    #[serde(default)]
    pub high_24h: UsdValue,
    #[serde(default)]
    pub low_24h: UsdValue,
    #[serde(default)]
    pub total_volume: UsdValue,
    #[serde(default)]
    pub market_cap: UsdValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsdValue {
    pub usd: Option<Decimal>,
}

/// Response of `GET /coins/{id}/market_chart`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChartResponse {
    pub prices: Vec<(Decimal, Decimal)>,
}

impl MarketChartResponse {
    /// Converts `[millis, price]` pairs into price points, keeping upstream order.
    ///
    /// # Errors
    ///
    /// Returns [`SolwatchError::MalformedPayload`] if a timestamp does not fit
    /// in epoch milliseconds.
    pub fn into_points(self) -> Result<Vec<PricePoint>> {
        self.prices
            .into_iter()
            .map(|(ts, price)| {
                let timestamp = ts.trunc().to_i64().ok_or_else(|| {
                    SolwatchError::MalformedPayload(format!("invalid timestamp {ts}"))
                })?;
                Ok(PricePoint::new(timestamp, price))
            })
            .collect()
    }
}
