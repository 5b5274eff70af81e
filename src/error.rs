//! Error types for data access
//!
//! Every fetch operation returns [`Result`]. Callers that want the
//! "never fail, just come back empty" behavior opt in through [`FailSoft`].

use thiserror::Error;

/// Result type alias for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors that can occur while fetching a collection or record
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FetchError {
    /// Network unreachable, connection reset, invalid URL, ...
    #[error("Request failed: {0}")]
    Transport(String),

    /// Non-2xx HTTP response
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Body was not the JSON shape we expected
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Local file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// HTTP status code, if this error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return FetchError::Status {
                status: status.as_u16(),
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            };
        }
        if e.is_decode() {
            return FetchError::Parse(e.to_string());
        }
        FetchError::Transport(e.to_string())
    }
}

/// Convert a failed fetch into an empty value, logging the failure.
///
/// Collections become empty, lookups become `None`.
pub trait FailSoft<T> {
    fn or_empty(self, context: &str) -> T;
}

impl<T: Default> FailSoft<T> for Result<T> {
    fn or_empty(self, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                T::default()
            }
        }
    }
}

/// Format a fetch error for display
///
/// Keeps messages short and strips anything that is not printable ASCII.
pub fn format_fetch_error(error: &FetchError) -> String {
    match error {
        FetchError::Status { status: 404, .. } => return "Resource not found.".to_string(),
        FetchError::Status { status: 429, .. } => {
            return "Rate limit exceeded. Please try again later.".to_string()
        }
        FetchError::Status { status, .. } if *status >= 500 => {
            return "Server temporarily unavailable. Please try again.".to_string()
        }
        FetchError::Transport(_) => {
            return "Request failed. Check your network connection and try again.".to_string()
        }
        _ => {}
    }

    let error_str = error.to_string();
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_empty_on_error_yields_default() {
        let result: Result<Vec<u32>> = Err(FetchError::Status {
            status: 500,
            url: "http://localhost/tech".to_string(),
        });
        assert!(result.or_empty("tech").is_empty());

        let lookup: Result<Option<u32>> = Err(FetchError::Parse("bad".to_string()));
        assert_eq!(lookup.or_empty("tech lookup"), None);
    }

    #[test]
    fn test_or_empty_passes_values_through() {
        let result: Result<Vec<u32>> = Ok(vec![1, 2]);
        assert_eq!(result.or_empty("numbers"), vec![1, 2]);
    }

    #[test]
    fn test_format_fetch_error() {
        let not_found = FetchError::Status {
            status: 404,
            url: "x".to_string(),
        };
        assert_eq!(format_fetch_error(&not_found), "Resource not found.");
        assert!(not_found.is_not_found());

        let long = FetchError::Parse("x".repeat(200));
        let formatted = format_fetch_error(&long);
        assert!(formatted.ends_with("..."));
        assert!(formatted.len() <= 83);
    }
}
