//! Data model shared by the fetcher, the store and the UI.
//!
//! [`PricePoint`] and [`Snapshot`] are the domain types; the [`wire`]
//! module holds the CoinGecko response shapes they are decoded from.

pub mod price;
pub mod snapshot;
pub mod wire;

pub use price::PricePoint;
pub use snapshot::Snapshot;
