//! Synchronization of the registry with upstream releases.
//!
//! A pass walks the configured repositories one after another: fetch the
//! release list, download the newest release's descriptor, build the
//! `Addon`. The resulting catalog is published in a single swap.

use super::catalog::Catalog;
use super::descriptor::parse_descriptor;
use super::registry::Registry;
use super::resolver::asset_download_url;
use super::types::{Addon, AddonError, DESCRIPTOR_FILENAME};
use crate::github::ReleaseClient;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// How a pass treats repositories that fail to synchronize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// Any failure aborts the pass; the previous catalog stays published.
    #[default]
    AllOrNothing,
    /// Failing repositories are skipped; the rest is published.
    Partial,
}

impl SyncMode {
    /// Parses a sync mode from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all-or-nothing" | "strict" | "all" => Some(Self::AllOrNothing),
            "partial" | "lenient" => Some(Self::Partial),
            _ => None,
        }
    }

    /// Returns the config name for this mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllOrNothing => "all-or-nothing",
            Self::Partial => "partial",
        }
    }
}

/// Synchronization error types.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// No repositories are configured.
    #[error("No repositories configured")]
    NoRepositories,

    /// A repository failed and the pass was aborted.
    #[error("Synchronization of '{repository}' failed: {source}")]
    Repository {
        repository: String,
        #[source]
        source: AddonError,
    },

    /// Every repository failed.
    #[error("All {0} repositories failed to synchronize")]
    AllFailed(usize),
}

/// Outcome of a successful pass.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Number of add-ons published.
    pub addons: usize,
    /// Repositories skipped in partial mode, with the reason.
    pub failed: Vec<(String, AddonError)>,
    /// Wall time of the pass.
    pub elapsed: Duration,
}

/// Builds catalogs from upstream releases and publishes them.
#[derive(Debug)]
pub struct Synchronizer {
    /// Upstream client.
    client: ReleaseClient,
    /// Repositories in "owner/name" form.
    repositories: Vec<String>,
    /// Failure policy.
    mode: SyncMode,
    /// Serializes passes so an older pass cannot overwrite a newer one.
    pass_lock: Mutex<()>,
}

impl Synchronizer {
    /// Creates a synchronizer for the given repositories.
    #[must_use]
    pub fn new(client: ReleaseClient, repositories: Vec<String>, mode: SyncMode) -> Self {
        Self {
            client,
            repositories,
            mode,
            pass_lock: Mutex::new(()),
        }
    }

    /// Returns the configured repositories.
    #[must_use]
    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }

    /// Returns the failure policy.
    #[must_use]
    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Fetches one repository and builds its add-on.
    pub async fn fetch_addon(&self, repository: &str) -> Result<Addon, AddonError> {
        let releases = self.client.fetch_releases(repository).await?;

        let newest = releases
            .first()
            .ok_or_else(|| AddonError::EmptyReleaseSet(repository.to_string()))?;

        let url = asset_download_url(newest, DESCRIPTOR_FILENAME);
        debug!("[SYNC] {} descriptor: {}", repository, url);

        let raw = self.client.fetch_text(&url).await?;
        let descriptor = parse_descriptor(&raw)?;

        info!(
            "[SYNC] {} -> {} v{} ({} releases)",
            repository,
            descriptor.id,
            descriptor.version,
            releases.len()
        );
        Addon::new(descriptor, releases)
    }

    /// Builds a fresh catalog without publishing it.
    pub async fn build_catalog(&self) -> Result<(Catalog, Vec<(String, AddonError)>), SyncError> {
        if self.repositories.is_empty() {
            return Err(SyncError::NoRepositories);
        }

        let mut addons = Vec::with_capacity(self.repositories.len());
        let mut failed = Vec::new();

        for repository in &self.repositories {
            match self.fetch_addon(repository).await {
                Ok(addon) => addons.push(addon),
                Err(e) => {
                    warn!("[SYNC] Failed to synchronize '{}': {}", repository, e);
                    match self.mode {
                        SyncMode::AllOrNothing => {
                            return Err(SyncError::Repository {
                                repository: repository.clone(),
                                source: e,
                            });
                        }
                        SyncMode::Partial => failed.push((repository.clone(), e)),
                    }
                }
            }
        }

        if addons.is_empty() {
            return Err(SyncError::AllFailed(failed.len()));
        }

        Ok((Catalog::from_addons(addons), failed))
    }

    /// Runs a pass and publishes the result into `registry`.
    ///
    /// On error the registry keeps its previous catalog.
    pub async fn synchronize(&self, registry: &Registry) -> Result<SyncReport, SyncError> {
        let _pass = self.pass_lock.lock().await;
        let start = Instant::now();

        info!(
            "[SYNC] Starting pass over {} repositories ({})",
            self.repositories.len(),
            self.mode.as_str()
        );

        let (catalog, failed) = self.build_catalog().await.inspect_err(|e| {
            warn!("[SYNC] Pass aborted, keeping previous catalog: {}", e);
        })?;

        let addons = catalog.len();
        registry.replace(catalog);

        let elapsed = start.elapsed();
        info!(
            "[SYNC] Pass finished in {:?}: {} addons, {} repositories skipped",
            elapsed,
            addons,
            failed.len()
        );

        Ok(SyncReport {
            addons,
            failed,
            elapsed,
        })
    }
}
