//! xbmc-repo - Main entry point.
//!
//! Serves GitHub releases as an XBMC/Kodi add-on repository.
//!
//! Usage: xbmc-repo [OPTIONS] [OWNER/NAME ...]
//!
//! Options:
//!   --config <PATH>  Config file (default ~/.xbmc-repo/config.toml)
//!   --port <PORT>    Listen port (default $PORT, then 8080)
//!   --version, -v    Show version

use std::env;
use std::sync::Arc;

use xbmc_release_repo::addons::{Registry, Synchronizer};
use xbmc_release_repo::config::{CliArgs, Config, USAGE};
use xbmc_release_repo::github::ReleaseClient;
use xbmc_release_repo::logging;
use xbmc_release_repo::server::{AppState, RepoServer};

/// Current version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args = CliArgs::parse(env::args().skip(1))?;

    if args.version {
        println!("xbmc-repo v{}", VERSION);
        return Ok(());
    }

    if args.help {
        print!("{}", USAGE);
        return Ok(());
    }

    // Layer config file, environment and flags
    let mut config = match args.config_path.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_env()?;
    args.apply_to(&mut config);
    config.validate()?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = logging::init(&config.log_config())?;

    tracing::info!(
        "xbmc-repo v{} serving {} repositories",
        VERSION,
        config.repositories.len()
    );

    let client = ReleaseClient::new(config.client_options())?;
    let synchronizer = Synchronizer::new(client, config.repositories.clone(), config.sync_mode);
    let state = AppState::new(Arc::new(Registry::new()), Arc::new(synchronizer));

    // Serve even if the first pass fails; /reload or the refresh task can recover
    if let Err(e) = state.synchronize().await {
        tracing::warn!("Initial synchronization failed: {}", e);
    }

    let server = RepoServer::start(state, config.socket_addr(), config.refresh_interval()).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Interrupt received, shutting down");
    server.stop().await;

    Ok(())
}
