//! Image viewer state
//!
//! The viewer is either closed or showing one image. [`ViewerState`] holds
//! the value and its two transitions; [`ViewerHandle`] is a cloneable handle
//! that components are given explicitly and can subscribe to.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerState {
    pub is_open: bool,
    pub src: String,
    pub alt: String,
}

impl ViewerState {
    /// Viewer showing `src`
    pub fn open(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            is_open: true,
            src: src.into(),
            alt: alt.into(),
        }
    }

    /// Closed viewer with empty `src` and `alt`
    pub fn close() -> Self {
        Self::default()
    }
}

/// Shared handle to one viewer's state
#[derive(Debug, Clone)]
pub struct ViewerHandle {
    tx: Arc<watch::Sender<ViewerState>>,
}

impl ViewerHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ViewerState::close());
        Self { tx: Arc::new(tx) }
    }

    pub fn open(&self, src: impl Into<String>, alt: impl Into<String>) {
        let state = ViewerState::open(src, alt);
        tracing::debug!("Viewer open: {}", state.src);
        self.tx.send_replace(state);
    }

    pub fn close(&self) {
        tracing::debug!("Viewer close");
        self.tx.send_replace(ViewerState::close());
    }

    /// Snapshot of the current state
    pub fn current(&self) -> ViewerState {
        self.tx.borrow().clone()
    }

    /// Receiver that is notified on every transition
    pub fn subscribe(&self) -> watch::Receiver<ViewerState> {
        self.tx.subscribe()
    }
}

impl Default for ViewerHandle {
    fn default() -> Self {
        Self::new()
    }
}
