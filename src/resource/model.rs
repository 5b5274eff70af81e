//! Typed records
//!
//! Field names match the JSON served by the backend and written to the
//! static data files.

use super::kind::ResourceKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A record that belongs to a resource kind and has a unique id
pub trait Resource: DeserializeOwned + Send {
    const KIND: ResourceKind;

    fn id(&self) -> &str;
}

/// A tech showcase entry: a small program with its source files inlined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechShowcase {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub description: String,
    /// File name -> file content
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

impl Resource for TechShowcase {
    const KIND: ResourceKind = ResourceKind::Tech;

    fn id(&self) -> &str {
        &self.id
    }
}

/// A portfolio project with its downloadable assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub pdf: Option<String>,
    /// File name -> URL
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

impl Resource for Project {
    const KIND: ResourceKind = ResourceKind::Project;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Lookup key of an untyped record: `id`, falling back to `symbol`
pub fn record_id(record: &Value) -> Option<&str> {
    record
        .get("id")
        .or_else(|| record.get("symbol"))
        .and_then(|v| v.as_str())
}

/// First record whose key equals `id`
pub fn find_by_id<'a>(records: &'a [Value], id: &str) -> Option<&'a Value> {
    records.iter().find(|r| record_id(r) == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_prefers_id_then_symbol() {
        assert_eq!(record_id(&json!({"id": "a", "symbol": "b"})), Some("a"));
        assert_eq!(record_id(&json!({"symbol": "AAPL"})), Some("AAPL"));
        assert_eq!(record_id(&json!({"id": 7})), None);
        assert_eq!(record_id(&json!("plain")), None);
    }

    #[test]
    fn test_find_by_id_returns_first_match() {
        let records = vec![
            json!({"id": "x", "n": 1}),
            json!({"id": "y", "n": 2}),
            json!({"id": "y", "n": 3}),
        ];
        assert_eq!(find_by_id(&records, "y").unwrap()["n"], 2);
        assert!(find_by_id(&records, "z").is_none());
    }

    #[test]
    fn test_project_defaults_missing_fields() {
        let project: Project = serde_json::from_value(json!({"id": "ERoots"})).unwrap();
        assert_eq!(project.id(), "ERoots");
        assert!(project.logo.is_none());
        assert!(project.files.is_empty());
    }
}
