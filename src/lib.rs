//! Terminal price monitor for a single crypto asset.
//!
//! Polls a CoinGecko-compatible API for the asset's market snapshot,
//! caches price history per timeframe, and renders the selected series
//! with summary statistics in a Ratatui terminal UI. All market state is
//! owned by a single [`coordinator::RefreshCoordinator`] task.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod models;
pub mod sink;
pub mod stats;
pub mod store;
pub mod timeframe;
pub mod tui;

pub use error::{Result, SolwatchError};
