//! Price data retrieval.
//!
//! [`PriceFetcher`] is the seam between the refresh logic and the remote
//! API; [`CoinGeckoFetcher`] implements it against the public CoinGecko v3
//! REST endpoints.

use async_trait::async_trait;
use tracing::debug;

use crate::models::wire::{CoinResponse, MarketChartResponse};
use crate::models::{PricePoint, Snapshot};
use crate::timeframe::SampleGranularity;
use crate::{Result, SolwatchError};

/// Public CoinGecko v3 endpoint.
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Quote currency for every request.
const VS_CURRENCY: &str = "usd";

/// Source of snapshot and history data.
#[async_trait]
pub trait PriceFetcher: Send + Sync {
    /// Fetches the current full-ticker data for `asset_id`.
    async fn fetch_snapshot(&self, asset_id: &str) -> Result<Snapshot>;

    /// Fetches the price history window for `asset_id`, oldest first.
    async fn fetch_history(
        &self,
        asset_id: &str,
        lookback_days: u32,
        granularity: SampleGranularity,
    ) -> Result<Vec<PricePoint>>;
}

/// HTTP client for the CoinGecko API.
#[derive(Debug, Clone)]
pub struct CoinGeckoFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoFetcher {
    /// Creates a fetcher rooted at `base_url` (no trailing slash required).
    ///
    /// # Errors
    ///
    /// Returns [`SolwatchError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("solwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SolwatchError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `GET /coins/{id}` with the large sections of the payload disabled.
    pub fn snapshot_url(&self, asset_id: &str) -> String {
        format!(
            "{}/coins/{}?localization=false&tickers=false&community_data=false&developer_data=false",
            self.base_url, asset_id
        )
    }

    /// `GET /coins/{id}/market_chart?vs_currency=usd&days={days}[&interval={interval}]`
    pub fn history_url(
        &self,
        asset_id: &str,
        lookback_days: u32,
        granularity: SampleGranularity,
    ) -> String {
        let mut url = format!(
            "{}/coins/{}/market_chart?vs_currency={}&days={}",
            self.base_url, asset_id, VS_CURRENCY, lookback_days
        );
        if let Some(interval) = granularity.interval_param() {
            url.push_str("&interval=");
            url.push_str(interval);
        }
        url
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SolwatchError::UpstreamStatus {
                code: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl PriceFetcher for CoinGeckoFetcher {
    async fn fetch_snapshot(&self, asset_id: &str) -> Result<Snapshot> {
        let response = self.get(&self.snapshot_url(asset_id)).await?;
        let body: CoinResponse = response.json().await?;
        Snapshot::from_wire(body, chrono::Utc::now().timestamp_millis())
    }

    async fn fetch_history(
        &self,
        asset_id: &str,
        lookback_days: u32,
        granularity: SampleGranularity,
    ) -> Result<Vec<PricePoint>> {
        let url = self.history_url(asset_id, lookback_days, granularity);
        let response = self.get(&url).await?;
        let body: MarketChartResponse = response.json().await?;
        body.into_points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_url_disables_heavy_sections() {
        let fetcher = CoinGeckoFetcher::new(DEFAULT_API_URL).unwrap();
        assert_eq!(
            fetcher.snapshot_url("solana"),
            "https://api.coingecko.com/api/v3/coins/solana?localization=false&tickers=false&community_data=false&developer_data=false"
        );
    }

    #[test]
    fn history_url_with_interval() {
        let fetcher = CoinGeckoFetcher::new(DEFAULT_API_URL).unwrap();
        assert_eq!(
            fetcher.history_url("solana", 1, SampleGranularity::Hourly),
            "https://api.coingecko.com/api/v3/coins/solana/market_chart?vs_currency=usd&days=1&interval=hourly"
        );
    }

    #[test]
    fn history_url_with_auto_granularity() {
        let fetcher = CoinGeckoFetcher::new("http://localhost:8080/api/").unwrap();
        assert_eq!(
            fetcher.history_url("bitcoin", 1, SampleGranularity::FiveMinutes),
            "http://localhost:8080/api/coins/bitcoin/market_chart?vs_currency=usd&days=1"
        );
    }
}
