//! Reusable UI panels.

pub mod chart;
pub mod price_panel;
pub mod stats_bar;
pub mod status_bar;
pub mod timeframe_bar;
