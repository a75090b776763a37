//! Process-wide add-on registry.
//!
//! Holds the current [`Catalog`] behind a reference that is swapped in one
//! step. Readers clone the `Arc` and keep a consistent snapshot for as long
//! as they need it.

use super::catalog::Catalog;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Registry of synchronized add-ons.
#[derive(Debug, Default)]
pub struct Registry {
    /// Current snapshot.
    current: RwLock<Arc<Catalog>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Catalog> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replaces the current snapshot, returning the previous one.
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let next = Arc::new(catalog);
        let count = next.len();

        let previous = {
            let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *guard, next)
        };

        info!(
            "[REGISTRY] Published {} addons (previously {})",
            count,
            previous.len()
        );
        previous
    }

    /// Returns true once at least one synchronization has been published.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.snapshot().synced_at().is_some()
    }
}
