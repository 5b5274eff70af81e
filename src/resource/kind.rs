//! Resource kinds and where they live
//!
//! A kind maps to a REST path segment and to a static JSON file. Which of
//! the two is used depends on the [`Layout`] the client is configured with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A logical category of fetchable data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Tech,
    Project,
}

impl ResourceKind {
    /// REST path segment, e.g. `tech` for `/tech` and `/tech/{id}`
    pub fn segment(&self) -> &'static str {
        match self {
            Self::Tech => "tech",
            Self::Project => "project",
        }
    }

    /// Static file path relative to the site base
    pub fn static_file(&self) -> &'static str {
        match self {
            Self::Tech => "data/tech.json",
            Self::Project => "data/project.json",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tech" => Ok(Self::Tech),
            "project" | "projects" => Ok(Self::Project),
            other => Err(format!("Unknown resource kind: {}", other)),
        }
    }
}

/// How collections are laid out under the base location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Pre-generated JSON files: `data/{kind}.json`
    #[default]
    Static,
    /// REST backend: `/{kind}` and `/{kind}/{id}`
    Rest,
}

impl Layout {
    /// Path of the full collection for `kind`
    pub fn collection_path(&self, kind: ResourceKind) -> String {
        match self {
            Self::Static => kind.static_file().to_string(),
            Self::Rest => kind.segment().to_string(),
        }
    }

    /// Path of a single record, if this layout can address one directly
    pub fn record_path(&self, kind: ResourceKind, id: &str) -> Option<String> {
        match self {
            Self::Static => None,
            Self::Rest => Some(format!("{}/{}", kind.segment(), urlencoding::encode(id))),
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "rest" | "api" => Ok(Self::Rest),
            other => Err(format!("Unknown layout: {}", other)),
        }
    }
}
