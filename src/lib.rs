//! xbmc-release-repo
//!
//! Serves the releases of a set of GitHub repositories as an XBMC/Kodi
//! add-on repository.
//!
//! # Architecture
//!
//! - **GitHub Module**: Release listing and raw asset download
//! - **Addons Module**: Descriptor extraction, URL resolution, registry and
//!   synchronization
//! - **Server Module**: Axum routes implementing the repository contract
//! - **Config Module**: TOML file, environment and command-line settings
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use xbmc_release_repo::addons::{Registry, Synchronizer};
//! use xbmc_release_repo::config::Config;
//! use xbmc_release_repo::github::ReleaseClient;
//! use xbmc_release_repo::server::{AppState, RepoServer};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let client = ReleaseClient::new(config.client_options())?;
//! let sync = Synchronizer::new(client, config.repositories.clone(), config.sync_mode);
//! let state = AppState::new(Arc::new(Registry::new()), Arc::new(sync));
//! state.synchronize().await?;
//! let _server = RepoServer::start(state, config.socket_addr(), None).await?;
//! # Ok(())
//! # }
//! ```

// Clippy configuration - allow common patterns
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

pub mod addons;
pub mod config;
pub mod github;
pub mod logging;
pub mod server;

// Re-export main types
pub use addons::{Addon, Catalog, Registry, Synchronizer};
pub use config::Config;
pub use github::{Release, ReleaseAsset, ReleaseClient};
pub use server::RepoServer;
