//! Application configuration loaded from environment variables.
//!
//! Every setting is optional; unset or empty variables fall back to the
//! defaults below.
//!
//! - `SOLWATCH_ASSET_ID`: CoinGecko coin id (default `solana`)
//! - `SOLWATCH_API_URL`: API base URL
//! - `SOLWATCH_POLL_INTERVAL_MS`: snapshot polling period
//! - `SOLWATCH_HISTORY_REFRESH_MS`: history refresh period, at least the poll period
//! - `SOLWATCH_MAX_LIVE_POINTS`: cap of the live series
//! - `SOLWATCH_FETCH_TIMEOUT_MS`: per-request timeout
//! - `SOLWATCH_HISTORY_MODE`: `timeframes` or `live`
//! - `SOLWATCH_DEFAULT_TIMEFRAME`: initially selected timeframe key
//! - `SOLWATCH_LOG_FILE` / `SOLWATCH_LOG_LEVEL`: tracing output

use std::str::FromStr;
use std::time::Duration;

use crate::fetcher::DEFAULT_API_URL;
use crate::store::DEFAULT_MAX_LIVE_POINTS;
use crate::timeframe::{self, DEFAULT_TIMEFRAME};
use crate::{Result, SolwatchError};

const DEFAULT_ASSET_ID: &str = "solana";
const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;
const DEFAULT_HISTORY_REFRESH_MS: u64 = 300_000;
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_LOG_FILE: &str = "solwatch.log";

/// Which history model backs the chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HistoryMode {
    /// One series per registered timeframe, replaced on each fetch.
    #[default]
    Timeframes,
    /// A single bounded series seeded from the default timeframe and
    /// extended by every snapshot.
    Live,
}

impl FromStr for HistoryMode {
    type Err = SolwatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "timeframes" => Ok(HistoryMode::Timeframes),
            "live" => Ok(HistoryMode::Live),
            other => Err(SolwatchError::Config(format!(
                "SOLWATCH_HISTORY_MODE must be `timeframes` or `live`, got `{other}`"
            ))),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
    pub logging: LogConfig,
}

/// Settings consumed by the fetcher and the refresh coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub asset_id: String,
    pub api_url: String,
    pub poll_interval: Duration,
    pub history_refresh_interval: Duration,
    pub max_live_points: usize,
    pub fetch_timeout: Duration,
    pub history_mode: HistoryMode,
    pub default_timeframe: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            asset_id: DEFAULT_ASSET_ID.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            history_refresh_interval: Duration::from_millis(DEFAULT_HISTORY_REFRESH_MS),
            max_live_points: DEFAULT_MAX_LIVE_POINTS,
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            history_mode: HistoryMode::default(),
            default_timeframe: DEFAULT_TIMEFRAME.to_string(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub file: String,
    pub level: tracing::Level,
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`SolwatchError::Config`] if a value does not parse, a duration
/// or cap is zero, the history refresh period is shorter than the poll
/// period, or the default timeframe is not registered.
pub fn fetch_config() -> Result<AppConfig> {
    let defaults = MonitorConfig::default();

    let poll_interval = millis_var("SOLWATCH_POLL_INTERVAL_MS")?.unwrap_or(defaults.poll_interval);
    let history_refresh_interval = millis_var("SOLWATCH_HISTORY_REFRESH_MS")?
        .unwrap_or(defaults.history_refresh_interval);
    if history_refresh_interval < poll_interval {
        return Err(SolwatchError::Config(
            "SOLWATCH_HISTORY_REFRESH_MS must not be shorter than SOLWATCH_POLL_INTERVAL_MS"
                .to_string(),
        ));
    }

    let default_timeframe =
        non_empty_var("SOLWATCH_DEFAULT_TIMEFRAME").unwrap_or(defaults.default_timeframe);
    if timeframe::lookup(&default_timeframe).is_none() {
        return Err(SolwatchError::Config(format!(
            "SOLWATCH_DEFAULT_TIMEFRAME `{default_timeframe}` is not a known timeframe"
        )));
    }

    let history_mode = match non_empty_var("SOLWATCH_HISTORY_MODE") {
        Some(mode) => mode.parse()?,
        None => defaults.history_mode,
    };

    let monitor = MonitorConfig {
        asset_id: non_empty_var("SOLWATCH_ASSET_ID").unwrap_or(defaults.asset_id),
        api_url: non_empty_var("SOLWATCH_API_URL").unwrap_or(defaults.api_url),
        poll_interval,
        history_refresh_interval,
        max_live_points: positive_var("SOLWATCH_MAX_LIVE_POINTS")?
            .map(|n| n as usize)
            .unwrap_or(defaults.max_live_points),
        fetch_timeout: millis_var("SOLWATCH_FETCH_TIMEOUT_MS")?.unwrap_or(defaults.fetch_timeout),
        history_mode,
        default_timeframe,
    };

    let level = match non_empty_var("SOLWATCH_LOG_LEVEL") {
        Some(level) => level.parse::<tracing::Level>().map_err(|_| {
            SolwatchError::Config(format!("SOLWATCH_LOG_LEVEL `{level}` is not a log level"))
        })?,
        None => tracing::Level::INFO,
    };

    Ok(AppConfig {
        monitor,
        logging: LogConfig {
            file: non_empty_var("SOLWATCH_LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            level,
        },
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Parses a strictly positive integer variable.
fn positive_var(name: &str) -> Result<Option<u64>> {
    let Some(raw) = non_empty_var(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(SolwatchError::Config(format!("{name} must be greater than zero"))),
        Ok(n) => Ok(Some(n)),
        Err(e) => Err(SolwatchError::Config(format!("{name} `{raw}` is not a number: {e}"))),
    }
}

fn millis_var(name: &str) -> Result<Option<Duration>> {
    Ok(positive_var(name)?.map(Duration::from_millis))
}
