//! Add-on type definitions.
//!
//! Core data structures for the repository: the synchronized `Addon`
//! record and the error type shared by the add-on modules.

use super::descriptor::Descriptor;
use super::resolver::asset_download_url;
use crate::github::{GitHubError, Release};
use thiserror::Error;

/// File name of the add-on descriptor asset.
pub const DESCRIPTOR_FILENAME: &str = "addon.xml";

/// File name of the add-on icon asset.
pub const ICON_FILENAME: &str = "icon.png";

/// File name of the add-on fanart asset.
pub const FANART_FILENAME: &str = "fanart.jpg";

/// Suffix of installable package assets.
pub const PACKAGE_SUFFIX: &str = ".zip";

/// A synchronized add-on: descriptor metadata plus release history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addon {
    /// Add-on identifier from the descriptor (e.g., "plugin.video.foo").
    pub id: String,
    /// Version string from the descriptor.
    pub version: String,
    /// Display name from the descriptor.
    pub name: Option<String>,
    /// Provider name from the descriptor.
    pub provider: Option<String>,
    /// Raw descriptor, preamble removed, republished verbatim.
    pub xml_body: String,
    /// Releases in upstream order; the first one is current.
    pub releases: Vec<Release>,
}

impl Addon {
    /// Creates an add-on from its parsed descriptor and release history.
    ///
    /// # Errors
    /// Returns `EmptyReleaseSet` if `releases` is empty.
    pub fn new(descriptor: Descriptor, releases: Vec<Release>) -> Result<Self, AddonError> {
        if releases.is_empty() {
            return Err(AddonError::EmptyReleaseSet(descriptor.id));
        }

        Ok(Self {
            id: descriptor.id,
            version: descriptor.version,
            name: descriptor.name,
            provider: descriptor.provider,
            xml_body: descriptor.xml_body,
            releases,
        })
    }

    /// Returns the descriptor's display name, or the id when it has none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Returns the current release (the first one upstream lists).
    pub fn current_release(&self) -> Result<&Release, AddonError> {
        self.releases
            .first()
            .ok_or_else(|| AddonError::NoReleases(self.id.clone()))
    }

    /// Returns the download URL of `filename` in the current release.
    pub fn asset_url(&self, filename: &str) -> Result<String, AddonError> {
        let release = self.current_release()?;
        Ok(asset_download_url(release, filename))
    }

    /// Returns the package file names attached to the current release.
    #[must_use]
    pub fn package_names(&self) -> Vec<&str> {
        self.releases
            .first()
            .map(|r| {
                r.assets
                    .iter()
                    .map(|a| a.name.as_str())
                    .filter(|name| name.ends_with(PACKAGE_SUFFIX))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Concatenates the notes of every release in stored order.
    ///
    /// No separators are inserted between release bodies.
    #[must_use]
    pub fn changelog(&self) -> String {
        self.releases.iter().map(|r| r.body_text()).collect()
    }
}

/// Add-on error types.
#[derive(Debug, Clone, Error)]
pub enum AddonError {
    /// Upstream fetch failed.
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    /// Repository has no releases.
    #[error("Repository '{0}' has no releases")]
    EmptyReleaseSet(String),

    /// Descriptor markup is malformed or incomplete.
    #[error("Invalid add-on descriptor: {0}")]
    Descriptor(String),

    /// Add-on is not in the registry.
    #[error("addon '{0}' not found")]
    NotFound(String),

    /// Add-on has no current release.
    #[error("addon '{0}' has no releases")]
    NoReleases(String),
}
