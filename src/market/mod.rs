//! Market data
//!
//! Quote search and single-day price charts for the live market viewer demo.
//!
//! - [`provider`] - Endpoint paths and response parsing per data provider
//! - [`model`] - Normalized quotes, price points and snapshots
//! - [`client`] - [`MarketClient`], including the concurrent [`MarketClient::refresh`]

mod client;
mod model;
mod provider;

pub use client::{MarketClient, MarketConfig, MIN_QUERY_LEN};
pub use model::{percent_change, Chart, MarketData, MarketSnapshot, PricePoint, Quote, QuoteStats};
pub use provider::Provider;
