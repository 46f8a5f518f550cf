//! Terminal user interface for the price monitor.
//!
//! Provides a Ratatui-based TUI showing the latest snapshot, the selected
//! timeframe's chart and statistics, and the API status.

pub mod app;
pub mod components;
pub mod event;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use event::{Action, Event, Message};
pub use terminal::{Tui, restore_terminal, setup_terminal};
pub use ui::render;
