//! Market data providers
//!
//! Each provider knows its endpoint paths and how to read its response
//! shapes. Requests themselves go through [`MarketClient`](super::MarketClient).

use super::model::{Chart, PricePoint, Quote, QuoteStats};
use crate::error::{FetchError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Stocks, ETFs and indices
    #[default]
    Yahoo,
    /// Cryptocurrencies
    CoinGecko,
}

impl Provider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Yahoo => "https://query1.finance.yahoo.com",
            Self::CoinGecko => "https://api.coingecko.com/api/v3",
        }
    }

    pub fn search_path(&self, query: &str) -> String {
        let query = urlencoding::encode(query);
        match self {
            Self::Yahoo => format!("v1/finance/search?q={}", query),
            Self::CoinGecko => format!("search?query={}", query),
        }
    }

    /// Single-day price history
    pub fn chart_path(&self, id: &str) -> String {
        let id = urlencoding::encode(id);
        match self {
            Self::Yahoo => format!("v8/finance/chart/{}?range=1d&interval=5m", id),
            Self::CoinGecko => format!("coins/{}/market_chart?vs_currency=usd&days=1", id),
        }
    }

    pub fn stats_path(&self, id: &str) -> String {
        let id = urlencoding::encode(id);
        match self {
            Self::Yahoo => format!("v8/finance/chart/{}?range=1d&interval=1d", id),
            Self::CoinGecko => format!(
                "simple/price?ids={}&vs_currencies=usd&include_24hr_change=true",
                id
            ),
        }
    }

    /// Keep valid hits and normalize them
    pub fn parse_search(&self, response: &Value) -> Vec<Quote> {
        match self {
            Self::Yahoo => response
                .get("quotes")
                .and_then(|v| v.as_array())
                .map(|arr| {
                    arr.iter()
                        .filter(|q| {
                            q.get("isYahooFinance")
                                .and_then(|v| v.as_bool())
                                .unwrap_or(false)
                        })
                        .filter_map(yahoo_quote)
                        .collect()
                })
                .unwrap_or_default(),
            Self::CoinGecko => response
                .get("coins")
                .and_then(|v| v.as_array())
                .map(|arr| arr.iter().filter_map(gecko_coin).collect())
                .unwrap_or_default(),
        }
    }

    pub fn parse_chart(&self, response: &Value) -> Result<Chart> {
        match self {
            Self::Yahoo => parse_yahoo_chart(response),
            Self::CoinGecko => parse_gecko_chart(response),
        }
    }

    /// `Ok(None)` when the response does not mention `id`
    pub fn parse_stats(&self, id: &str, response: &Value) -> Result<Option<QuoteStats>> {
        match self {
            Self::Yahoo => {
                let chart = parse_yahoo_chart(response)?;
                Ok(chart.price.map(|price| QuoteStats {
                    price,
                    change_24h: super::percent_change(price, chart.previous_close),
                }))
            }
            Self::CoinGecko => {
                let Some(entry) = response.get(id) else {
                    return Ok(None);
                };
                let Some(price) = entry.get("usd").and_then(|v| v.as_f64()) else {
                    return Ok(None);
                };
                let change_24h = entry
                    .get("usd_24h_change")
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0);
                Ok(Some(QuoteStats { price, change_24h }))
            }
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yahoo" => Ok(Self::Yahoo),
            "coingecko" | "gecko" => Ok(Self::CoinGecko),
            other => Err(format!("Unknown market provider: {}", other)),
        }
    }
}

fn yahoo_quote(q: &Value) -> Option<Quote> {
    let symbol = q.get("symbol").and_then(|v| v.as_str())?;
    let name = q
        .get("shortname")
        .or_else(|| q.get("longname"))
        .and_then(|v| v.as_str())
        .unwrap_or(symbol);
    let kind = q.get("quoteType").and_then(|v| v.as_str()).unwrap_or("");

    Some(Quote {
        symbol: symbol.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
    })
}

fn gecko_coin(c: &Value) -> Option<Quote> {
    let id = c.get("id").and_then(|v| v.as_str()).filter(|s| !s.is_empty())?;
    let name = c.get("name").and_then(|v| v.as_str()).unwrap_or(id);

    Some(Quote {
        symbol: id.to_string(),
        name: name.to_string(),
        kind: "CRYPTOCURRENCY".to_string(),
    })
}

/// `chart.result[0].{meta,indicators.quote[0].close,timestamp}`
fn parse_yahoo_chart(response: &Value) -> Result<Chart> {
    let result = response
        .get("chart")
        .and_then(|c| c.get("result"))
        .and_then(|r| r.get(0))
        .ok_or_else(|| FetchError::Parse("missing chart.result[0]".to_string()))?;

    let meta = result.get("meta");
    let meta_f64 = |key: &str| meta.and_then(|m| m.get(key)).and_then(|v| v.as_f64());

    let timestamps = result
        .get("timestamp")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    let closes = result
        .get("indicators")
        .and_then(|i| i.get("quote"))
        .and_then(|q| q.get(0))
        .and_then(|q| q.get("close"))
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    // Yahoo pads intervals without trades with null closes
    let history: Vec<PricePoint> = timestamps
        .iter()
        .zip(closes.iter())
        .filter_map(|(ts, close)| {
            let millis = ts.as_i64()?.checked_mul(1000)?;
            let price = close.as_f64()?;
            Some(PricePoint(millis, price))
        })
        .collect();

    let price = meta_f64("regularMarketPrice").or_else(|| history.last().map(|p| p.price()));
    let previous_close = meta_f64("chartPreviousClose").or_else(|| meta_f64("previousClose"));

    Ok(Chart {
        history,
        price,
        previous_close,
    })
}

/// `{"prices": [[ms, price], ...]}`
///
/// The window's first sample stands in for the previous close.
fn parse_gecko_chart(response: &Value) -> Result<Chart> {
    let prices = response
        .get("prices")
        .and_then(|v| v.as_array())
        .ok_or_else(|| FetchError::Parse("missing prices".to_string()))?;

    let history: Vec<PricePoint> = prices
        .iter()
        .filter_map(|pair| {
            let ts = pair.get(0)?.as_f64()?;
            let price = pair.get(1)?.as_f64()?;
            Some(PricePoint(ts as i64, price))
        })
        .collect();

    Ok(Chart {
        price: history.last().map(|p| p.price()),
        previous_close: history.first().map(|p| p.price()),
        history,
    })
}
