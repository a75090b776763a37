//! Shared state for the repository server.

use std::sync::Arc;

use crate::addons::{Registry, SyncError, SyncReport, Synchronizer};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current add-on snapshot.
    pub registry: Arc<Registry>,
    /// Builds new snapshots from upstream.
    pub synchronizer: Arc<Synchronizer>,
}

impl AppState {
    /// Creates a new state.
    #[must_use]
    pub fn new(registry: Arc<Registry>, synchronizer: Arc<Synchronizer>) -> Self {
        Self {
            registry,
            synchronizer,
        }
    }

    /// Runs a synchronization pass against the shared registry.
    pub async fn synchronize(&self) -> Result<SyncReport, SyncError> {
        self.synchronizer.synchronize(&self.registry).await
    }
}
