//! Market data shapes

use serde::{Deserialize, Serialize};

/// One search hit, normalized across providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Id used for chart and stats requests (ticker or coin id)
    pub symbol: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A single `(timestamp_millis, price)` sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint(pub i64, pub f64);

impl PricePoint {
    pub fn timestamp_millis(&self) -> i64 {
        self.0
    }

    pub fn price(&self) -> f64 {
        self.1
    }
}

/// Parsed single-day chart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chart {
    pub history: Vec<PricePoint>,
    pub price: Option<f64>,
    pub previous_close: Option<f64>,
}

/// Current price and change against the previous close
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteStats {
    pub price: f64,
    pub change_24h: f64,
}

/// Result of a single chart fetch: history plus derived price and change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub history: Vec<PricePoint>,
    pub current_price: Option<f64>,
    pub change_24h: f64,
}

impl From<Chart> for MarketData {
    fn from(chart: Chart) -> Self {
        let change_24h = chart
            .price
            .map(|price| percent_change(price, chart.previous_close))
            .unwrap_or(0.0);

        Self {
            history: chart.history,
            current_price: chart.price,
            change_24h,
        }
    }
}

/// Combined result of [`refresh`](super::MarketClient::refresh)
///
/// A side whose request failed is left at its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub history: Vec<PricePoint>,
    pub current_price: Option<f64>,
    pub change_24h: Option<f64>,
}

/// Percentage change of `price` from `previous_close`
///
/// A missing, zero or non-finite previous close yields exactly `0.0`.
pub fn percent_change(price: f64, previous_close: Option<f64>) -> f64 {
    match previous_close {
        Some(prev) if prev != 0.0 && prev.is_finite() => (price - prev) / prev * 100.0,
        _ => 0.0,
    }
}
