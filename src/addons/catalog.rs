//! Immutable snapshot of the synchronized add-ons.
//!
//! Every aggregate the repository serves (`addons.xml`, its checksum, the
//! package index, changelogs, asset redirects) is computed from a single
//! `Catalog`, so a response never mixes two synchronization passes.

use super::types::{Addon, AddonError};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use std::collections::BTreeMap;
use tracing::warn;

/// Opening tag of the combined descriptor document.
const ADDONS_OPEN: &str = "<addons>";

/// Closing tag of the combined descriptor document.
const ADDONS_CLOSE: &str = "</addons>";

/// Add-ons keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Ordered by id, which keeps `addons.xml` stable across passes.
    addons: BTreeMap<String, Addon>,
    /// When the pass that built this catalog finished.
    synced_at: Option<DateTime<Utc>>,
}

impl Catalog {
    /// Creates an empty catalog (the state before the first sync).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a catalog from synchronized add-ons.
    ///
    /// A later add-on with an id already present replaces the earlier one.
    #[must_use]
    pub fn from_addons(addons: impl IntoIterator<Item = Addon>) -> Self {
        let mut map = BTreeMap::new();
        for addon in addons {
            if let Some(previous) = map.insert(addon.id.clone(), addon) {
                warn!("[CATALOG] Duplicate addon id '{}', keeping the later one", previous.id);
            }
        }

        Self {
            addons: map,
            synced_at: Some(Utc::now()),
        }
    }

    /// Returns the number of add-ons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.addons.len()
    }

    /// Returns true if no add-ons are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addons.is_empty()
    }

    /// Returns when this catalog was built, `None` for the initial empty one.
    #[must_use]
    pub fn synced_at(&self) -> Option<DateTime<Utc>> {
        self.synced_at
    }

    /// Looks up an add-on by id.
    pub fn get(&self, id: &str) -> Result<&Addon, AddonError> {
        self.addons
            .get(id)
            .ok_or_else(|| AddonError::NotFound(id.to_string()))
    }

    /// Iterates over the add-ons in id order.
    pub fn addons(&self) -> impl Iterator<Item = &Addon> {
        self.addons.values()
    }

    /// Returns the add-on ids in order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.addons.keys().map(String::as_str).collect()
    }

    /// Lists the package files of every add-on's current release, paired
    /// with the add-on that owns them.
    #[must_use]
    pub fn package_filenames(&self) -> Vec<(&Addon, &str)> {
        self.addons()
            .flat_map(|addon| addon.package_names().into_iter().map(move |file| (addon, file)))
            .collect()
    }

    /// Builds the combined descriptor document served as `addons.xml`.
    #[must_use]
    pub fn addons_xml(&self) -> String {
        let capacity = self.addons().map(|a| a.xml_body.len()).sum::<usize>()
            + ADDONS_OPEN.len()
            + ADDONS_CLOSE.len();

        let mut document = String::with_capacity(capacity);
        document.push_str(ADDONS_OPEN);
        for addon in self.addons() {
            document.push_str(&addon.xml_body);
        }
        document.push_str(ADDONS_CLOSE);
        document
    }

    /// Returns the lowercase hex MD5 of [`Catalog::addons_xml`].
    #[must_use]
    pub fn addons_xml_md5(&self) -> String {
        hex::encode(Md5::digest(self.addons_xml().as_bytes()))
    }

    /// Returns the concatenated changelog of an add-on.
    pub fn changelog(&self, id: &str) -> Result<String, AddonError> {
        Ok(self.get(id)?.changelog())
    }

    /// Resolves the download URL of `filename` for an add-on.
    pub fn asset_url(&self, id: &str, filename: &str) -> Result<String, AddonError> {
        self.get(id)?.asset_url(filename)
    }
}
