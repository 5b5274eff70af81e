//! Market client

use super::model::{MarketData, MarketSnapshot, PricePoint, Quote, QuoteStats};
use super::provider::Provider;
use crate::error::{FailSoft, Result};
use crate::http::{join_location, HttpClient, Transport};
use serde::{Deserialize, Serialize};

/// Queries shorter than this never hit the network
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    #[serde(default)]
    pub provider: Provider,
    /// Overrides the provider's public endpoint
    #[serde(default)]
    pub base_url: Option<String>,
    /// Prefix that the percent-encoded target URL is appended to,
    /// e.g. `https://corsproxy.io/?url=`
    #[serde(default)]
    pub cors_relay: Option<String>,
}

impl MarketConfig {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            base_url: None,
            cors_relay: None,
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    /// Full request URL for a provider path, routed through the relay if set
    pub fn url_for(&self, path: &str) -> String {
        let target = join_location(self.base_url(), path);
        match self.cors_relay.as_deref() {
            Some(relay) if !relay.is_empty() => {
                format!("{}{}", relay, urlencoding::encode(&target))
            }
            _ => target,
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self::new(Provider::default())
    }
}

/// Stateless client for quote search and price history
#[derive(Clone)]
pub struct MarketClient<T = HttpClient> {
    transport: T,
    config: MarketConfig,
}

impl MarketClient<HttpClient> {
    pub fn http(config: MarketConfig) -> Result<Self> {
        Ok(Self::new(HttpClient::new()?, config))
    }
}

impl<T: Transport> MarketClient<T> {
    pub fn new(transport: T, config: MarketConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Search for instruments matching `query`
    pub async fn search(&self, query: &str) -> Result<Vec<Quote>> {
        if query.chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }

        let url = self.config.url_for(&self.config.provider.search_path(query));
        let response = self
            .transport
            .get_json(&url)
            .await
            .inspect_err(|e| tracing::error!("Search error for '{}': {}", query, e))?;

        let quotes = self.config.provider.parse_search(&response);
        tracing::debug!("Search '{}' returned {} quotes", query, quotes.len());
        Ok(quotes)
    }

    /// Single-day price history for `id`
    pub async fn fetch_chart(&self, id: &str) -> Result<Vec<PricePoint>> {
        Ok(self.fetch_market_data(id).await?.history)
    }

    /// History plus current price and change from the previous close
    pub async fn fetch_market_data(&self, symbol: &str) -> Result<MarketData> {
        let url = self.config.url_for(&self.config.provider.chart_path(symbol));
        let response = self
            .transport
            .get_json(&url)
            .await
            .inspect_err(|e| tracing::error!("Chart fetch error for {}: {}", symbol, e))?;

        let chart = self
            .config
            .provider
            .parse_chart(&response)
            .inspect_err(|e| tracing::error!("Chart parse error for {}: {}", symbol, e))?;

        Ok(MarketData::from(chart))
    }

    /// Current price and 24h change for `id`
    pub async fn fetch_stats(&self, id: &str) -> Result<Option<QuoteStats>> {
        let url = self.config.url_for(&self.config.provider.stats_path(id));
        let response = self
            .transport
            .get_json(&url)
            .await
            .inspect_err(|e| tracing::error!("Stats fetch error for {}: {}", id, e))?;

        self.config.provider.parse_stats(id, &response)
    }

    /// Fetch chart and stats concurrently and combine them
    ///
    /// Never fails: a side that errors is left at its default.
    pub async fn refresh(&self, id: &str) -> MarketSnapshot {
        let (history, stats) = futures::join!(self.fetch_chart(id), self.fetch_stats(id));

        let history = history.or_empty("refresh: chart");
        let stats = stats.or_empty("refresh: stats");

        MarketSnapshot {
            history,
            current_price: stats.map(|s| s.price),
            change_24h: stats.map(|s| s.change_24h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts requests and always fails
    #[derive(Default)]
    struct CountingTransport {
        calls: AtomicUsize,
    }

    impl Transport for CountingTransport {
        async fn get_json(&self, location: &str) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::Transport(format!("unreachable: {}", location)))
        }
    }

    /// Answers chart requests, fails stats requests
    struct ChartOnlyTransport;

    impl Transport for ChartOnlyTransport {
        async fn get_json(&self, location: &str) -> Result<Value> {
            if location.contains("market_chart") {
                Ok(json!({"prices": [[1700000000000.0, 100.0], [1700000300000.0, 101.0]]}))
            } else {
                Err(FetchError::Status {
                    status: 429,
                    url: location.to_string(),
                })
            }
        }
    }

    #[tokio::test]
    async fn test_short_query_issues_no_request() {
        let client = MarketClient::new(CountingTransport::default(), MarketConfig::default());

        for query in ["", "a", "é"] {
            assert!(client.search(query).await.unwrap().is_empty());
        }
        assert_eq!(client.transport.calls.load(Ordering::SeqCst), 0);

        assert!(client.search("ab").await.is_err());
        assert_eq!(client.transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_substitutes_defaults_when_both_fail() {
        let client = MarketClient::new(CountingTransport::default(), MarketConfig::default());

        let snapshot = client.refresh("AAPL").await;
        assert_eq!(snapshot, MarketSnapshot::default());
        assert_eq!(client.transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_keeps_successful_side() {
        let client = MarketClient::new(ChartOnlyTransport, MarketConfig::new(Provider::CoinGecko));

        let snapshot = client.refresh("bitcoin").await;
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.current_price, None);
        assert_eq!(snapshot.change_24h, None);
    }

    #[test]
    fn test_url_for_with_relay() {
        let config = MarketConfig {
            provider: Provider::Yahoo,
            base_url: None,
            cors_relay: Some("https://relay.example/?url=".to_string()),
        };
        assert_eq!(
            config.url_for("v1/finance/search?q=ap"),
            "https://relay.example/?url=https%3A%2F%2Fquery1.finance.yahoo.com%2Fv1%2Ffinance%2Fsearch%3Fq%3Dap"
        );

        let direct = MarketConfig::new(Provider::CoinGecko);
        assert_eq!(
            direct.url_for("search?query=btc"),
            "https://api.coingecko.com/api/v3/search?query=btc"
        );
    }
}
