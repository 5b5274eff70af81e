//! Resource collections
//!
//! Tech showcases and projects are served either as pre-generated JSON files
//! or by a small REST backend. Both are read through one generic client.
//!
//! # Architecture
//!
//! - [`kind`] - Resource kinds and the [`Layout`] that maps them to paths
//! - [`model`] - Typed records and id lookup helpers
//! - [`client`] - [`ResourceClient`], generic over the [`Transport`](crate::http::Transport)
//!
//! # Example
//!
//! ```ignore
//! use folio::resource::{Layout, Project, ResourceClient, ResourceConfig};
//!
//! async fn example() -> folio::Result<()> {
//!     let client = ResourceClient::http(ResourceConfig::new("http://localhost:8080/api", Layout::Rest))?;
//!     let project: Option<Project> = client.fetch("Portfolio").await?;
//!     Ok(())
//! }
//! ```

mod client;
mod kind;
mod model;

pub use client::{is_remote_location, ResourceClient, ResourceConfig};
pub use kind::{Layout, ResourceKind};
pub use model::{find_by_id, record_id, Project, Resource, TechShowcase};
