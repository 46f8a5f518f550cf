//! Latest full-ticker data for the tracked asset.

use rust_decimal::Decimal;

use super::wire::CoinResponse;
use crate::{Result, SolwatchError};

/// Current market state as reported by the `/coins/{id}` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub name: String,
    pub symbol: String,
    pub price: Decimal,
    /// 24h change in percent.
    pub change_pct: Decimal,
    pub high_24h: Decimal,
    pub low_24h: Decimal,
    pub volume_24h: Decimal,
    pub market_cap: Decimal,
    pub icon_url: Option<String>,
    /// Local receive time in epoch milliseconds.
    pub fetched_at: i64,
}

impl Snapshot {
    /// Converts the wire response into a snapshot, requiring every USD
    /// market field to be present.
    ///
    /// # Errors
    ///
    /// Returns [`SolwatchError::MalformedPayload`] naming the first missing field.
    pub fn from_wire(response: CoinResponse, fetched_at: i64) -> Result<Self> {
        let market = response
            .market_data
            .ok_or_else(|| missing("market_data"))?;

        Ok(Self {
            name: response.name,
            symbol: response.symbol,
            price: market
                .current_price
                .usd
                .ok_or_else(|| missing("market_data.current_price.usd"))?,
            change_pct: market
                .price_change_percentage_24h
                .ok_or_else(|| missing("market_data.price_change_percentage_24h"))?,
            high_24h: market
                .high_24h
                .usd
                .ok_or_else(|| missing("market_data.high_24h.usd"))?,
            low_24h: market
                .low_24h
                .usd
                .ok_or_else(|| missing("market_data.low_24h.usd"))?,
            volume_24h: market
                .total_volume
                .usd
                .ok_or_else(|| missing("market_data.total_volume.usd"))?,
            market_cap: market
                .market_cap
                .usd
                .ok_or_else(|| missing("market_data.market_cap.usd"))?,
            icon_url: response.image.and_then(|img| img.large),
            fetched_at,
        })
    }
}

fn missing(field: &str) -> SolwatchError {
    SolwatchError::MalformedPayload(format!("missing {field}"))
}
