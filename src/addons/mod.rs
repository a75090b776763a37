//! Add-on synchronization and resolution.
//!
//! This module turns GitHub releases into the records an XBMC/Kodi
//! repository serves.
//!
//! # Architecture
//!
//! - **types**: Core data structures (`Addon`, `AddonError`)
//! - **descriptor**: `addon.xml` parsing and preamble stripping
//! - **resolver**: Asset download URL computation
//! - **catalog**: Immutable snapshot and the aggregates built from it
//! - **registry**: Atomically swapped current snapshot
//! - **sync**: Synchronization passes over the configured repositories
//!
//! # Usage
//!
//! ```ignore
//! use xbmc_release_repo::addons::{Registry, SyncMode, Synchronizer};
//!
//! let sync = Synchronizer::new(client, vec!["steeve/xbmctorrent".into()], SyncMode::default());
//! let registry = Registry::new();
//! sync.synchronize(&registry).await?;
//! let xml = registry.snapshot().addons_xml();
//! ```

mod catalog;
mod descriptor;
mod registry;
mod resolver;
mod sync;
mod types;

pub use catalog::Catalog;
pub use descriptor::{parse_descriptor, strip_preamble, Descriptor};
pub use registry::Registry;
pub use resolver::asset_download_url;
pub use sync::{SyncError, SyncMode, SyncReport, Synchronizer};
#[cfg(test)]
pub(crate) use catalog::fixtures;

pub use types::{
    Addon, AddonError, DESCRIPTOR_FILENAME, FANART_FILENAME, ICON_FILENAME, PACKAGE_SUFFIX,
};
