//! Resource client
//!
//! One client for every resource kind. It fetches the whole collection from
//! the configured base location and answers lookups by scanning it.

use super::kind::{Layout, ResourceKind};
use super::model::{find_by_id, Resource};
use crate::error::{FetchError, Result};
use crate::http::{join_location, HttpClient, Transport};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where collections are fetched from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Site root or API root, e.g. `https://example.com/portfolio/` or `http://localhost:8080/api`
    pub base_url: String,
    #[serde(default)]
    pub layout: Layout,
}

impl ResourceConfig {
    pub fn new(base_url: impl Into<String>, layout: Layout) -> Self {
        Self {
            base_url: base_url.into(),
            layout,
        }
    }

    /// Whether the base is an http(s) URL rather than a local directory
    pub fn is_remote(&self) -> bool {
        is_remote_location(&self.base_url)
    }

    pub fn collection_url(&self, kind: ResourceKind) -> String {
        join_location(&self.base_url, &self.layout.collection_path(kind))
    }

    pub fn record_url(&self, kind: ResourceKind, id: &str) -> Option<String> {
        self.layout
            .record_path(kind, id)
            .map(|path| join_location(&self.base_url, &path))
    }
}

/// Stateless client for tech and project collections
#[derive(Clone)]
pub struct ResourceClient<T = HttpClient> {
    transport: T,
    config: ResourceConfig,
}

impl ResourceClient<HttpClient> {
    /// Create a client using the default HTTP transport
    pub fn http(config: ResourceConfig) -> Result<Self> {
        Ok(Self::new(HttpClient::new()?, config))
    }
}

impl<T: Transport> ResourceClient<T> {
    pub fn new(transport: T, config: ResourceConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// Fetch the full collection of `kind` as raw JSON records
    pub async fn fetch_all_resources(&self, kind: ResourceKind) -> Result<Vec<Value>> {
        let url = self.config.collection_url(kind);

        let records = match self.transport.get_json(&url).await {
            Ok(Value::Array(records)) => records,
            Ok(other) => {
                let err = FetchError::Parse(format!(
                    "expected a JSON array for {}, got {}",
                    kind,
                    json_type_name(&other)
                ));
                tracing::error!("Failed to fetch {} collection: {}", kind, err);
                return Err(err);
            }
            Err(e) => {
                tracing::error!("Failed to fetch {} collection: {}", kind, e);
                return Err(e);
            }
        };

        tracing::debug!("Fetched {} {} records", records.len(), kind);
        Ok(records)
    }

    /// Look up one raw record by id in the full collection
    pub async fn fetch_resource(&self, kind: ResourceKind, id: &str) -> Result<Option<Value>> {
        let records = self.fetch_all_resources(kind).await?;
        let found = find_by_id(&records, id).cloned();
        if found.is_none() {
            tracing::debug!("No {} record with id {}", kind, id);
        }
        Ok(found)
    }

    /// Look up one raw record through the backend's single-record endpoint
    ///
    /// A 404 is a miss, not an error. Layouts without a single-record path
    /// scan the collection instead.
    pub async fn fetch_resource_direct(
        &self,
        kind: ResourceKind,
        id: &str,
    ) -> Result<Option<Value>> {
        let Some(url) = self.config.record_url(kind, id) else {
            return self.fetch_resource(kind, id).await;
        };

        match self.transport.get_json(&url).await {
            Ok(Value::Null) => Ok(None),
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => {
                tracing::debug!("No {} record with id {}", kind, id);
                Ok(None)
            }
            Err(e) => {
                tracing::error!("Failed to fetch {} {}: {}", kind, id, e);
                Err(e)
            }
        }
    }

    /// Fetch and deserialize the full collection of `R`
    ///
    /// Records that do not deserialize are skipped, not fatal.
    pub async fn fetch_all<R: Resource>(&self) -> Result<Vec<R>> {
        let records = self.fetch_all_resources(R::KIND).await?;
        Ok(records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<R>(record) {
                Ok(r) => Some(r),
                Err(e) => {
                    tracing::warn!("Skipping invalid {} record #{}: {}", R::KIND, index, e);
                    None
                }
            })
            .collect())
    }

    /// Look up one typed record by id in the full collection
    pub async fn fetch<R: Resource>(&self, id: &str) -> Result<Option<R>> {
        let records = self.fetch_all::<R>().await?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }
}

pub fn is_remote_location(base_url: &str) -> bool {
    base_url.starts_with("http://") || base_url.starts_with("https://")
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
