//! Configuration Management
//!
//! Handles persistent configuration storage for folio. The library types
//! never read the environment; the CLI resolves a [`Config`] into
//! [`ResourceConfig`] and [`MarketConfig`] values.

use crate::market::MarketConfig;
use crate::registry::{Overrides, RecordOverride};
use crate::resource::{is_remote_location, Layout, ResourceConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Base URL used when neither the CLI nor the config file names one
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Site or API root
    #[serde(default)]
    pub base_url: Option<String>,
    /// Static files or REST backend
    #[serde(default)]
    pub layout: Option<Layout>,
    /// Market viewer settings
    #[serde(default)]
    pub market: MarketConfig,
    /// Uploads directory scanned by `export`
    #[serde(default)]
    pub uploads_dir: Option<PathBuf>,
    /// Title/description overrides by record id
    #[serde(default)]
    pub overrides: BTreeMap<String, RecordOverride>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("folio").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Effective resource location (CLI > config > default)
    ///
    /// Without an explicit layout, remote bases use the REST layout and
    /// local directories the static one.
    pub fn resource_config(&self, base_url: Option<&str>, layout: Option<Layout>) -> ResourceConfig {
        let base_url = base_url
            .map(str::to_string)
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let layout = layout.or(self.layout).unwrap_or_else(|| {
            if is_remote_location(&base_url) {
                Layout::Rest
            } else {
                Layout::Static
            }
        });

        ResourceConfig::new(base_url, layout)
    }

    pub fn overrides(&self) -> Overrides {
        Overrides::new(&self.overrides)
    }

    /// Set base URL and save
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        self.base_url = Some(base_url.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Provider;
    use crate::resource::ResourceKind;

    #[test]
    fn test_resource_config_precedence() {
        let config = Config {
            base_url: Some("https://me.github.io/portfolio".to_string()),
            layout: Some(Layout::Static),
            ..Default::default()
        };

        let from_file = config.resource_config(None, None);
        assert_eq!(from_file.base_url, "https://me.github.io/portfolio");
        assert_eq!(from_file.layout, Layout::Static);

        let from_cli = config.resource_config(Some("http://localhost:9000/api"), Some(Layout::Rest));
        assert_eq!(from_cli.base_url, "http://localhost:9000/api");
        assert_eq!(from_cli.layout, Layout::Rest);

        let defaults = Config::default().resource_config(None, None);
        assert_eq!(defaults.base_url, DEFAULT_BASE_URL);
        assert_eq!(defaults.layout, Layout::Rest);
    }

    #[test]
    fn test_local_base_defaults_to_static_layout() {
        let local = Config::default().resource_config(Some("./site"), None);
        assert_eq!(local.layout, Layout::Static);
        assert_eq!(local.collection_url(ResourceKind::Tech), "./site/data/tech.json");

        let explicit = Config::default().resource_config(Some("./site"), Some(Layout::Rest));
        assert_eq!(explicit.layout, Layout::Rest);

        let saved = Config {
            base_url: Some("/srv/www".to_string()),
            layout: Some(Layout::Rest),
            ..Default::default()
        };
        assert_eq!(saved.resource_config(None, None).layout, Layout::Rest);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio/config.json");

        let mut config = Config::default();
        config.market.provider = Provider::CoinGecko;
        config.overrides.insert(
            "ERoots".to_string(),
            RecordOverride {
                title: None,
                description: Some("Work in Progress".to_string()),
            },
        );
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
        assert_eq!(Config::load_from(&dir.path().join("missing.json")), Config::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"layout": "static"}"#).unwrap();
        assert_eq!(config.layout, Some(Layout::Static));
        assert_eq!(config.market.provider, Provider::Yahoo);
    }
}
