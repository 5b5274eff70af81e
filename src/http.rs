//! Transports for fetching JSON documents
//!
//! [`Transport`] is the seam the resource and market clients are generic
//! over. [`HttpClient`] talks to a REST backend or a static file host,
//! [`FsTransport`] reads the same documents from a local directory.

use crate::error::{FetchError, Result};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;

/// Maximum length of response body to log
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Join a base location and a relative path with exactly one `/`
pub fn join_location(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if base.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base, path)
}

/// Something that can GET a JSON document by location
pub trait Transport: Send + Sync {
    fn get_json(&self, location: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// HTTP transport backed by reqwest
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Transport for HttpClient {
    async fn get_json(&self, location: &str) -> Result<Value> {
        let url = url::Url::parse(location)
            .map_err(|e| FetchError::Transport(format!("Invalid URL '{}': {}", location, e)))?;

        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: location.to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Invalid JSON from {}: {}", location, sanitize_for_log(&body));
            FetchError::Parse(e.to_string())
        })
    }
}

/// Transport that reads JSON documents from the local filesystem
///
/// Locations are paths; a relative location is resolved against `root`.
#[derive(Debug, Clone, Default)]
pub struct FsTransport {
    root: PathBuf,
}

impl FsTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Transport for FsTransport {
    async fn get_json(&self, location: &str) -> Result<Value> {
        let path = self.root.join(location);
        tracing::debug!("READ {}", path.display());

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FetchError::Status {
                    status: 404,
                    url: path.display().to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&content)?)
    }
}
