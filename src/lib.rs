//! Data access for a portfolio site
//!
//! - [`resource`] - Tech showcase and project collections, from static files or a REST backend
//! - [`market`] - Quote search and single-day price charts
//! - [`viewer`] - Image viewer state
//! - [`registry`] - Builds the collections from an uploads directory
//! - [`http`] - Transports the clients are generic over
//! - [`config`] - Persistent CLI configuration

pub mod config;
pub mod error;
pub mod http;
pub mod market;
pub mod registry;
pub mod resource;
pub mod viewer;

pub use error::{format_fetch_error, FailSoft, FetchError, Result};
