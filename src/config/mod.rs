//! Configuration module for xbmc-release-repo.
//!
//! Settings are layered: built-in defaults, then the TOML config file
//! (`~/.xbmc-repo/config.toml` unless `--config` is given), then environment
//! variables, then command-line flags.

mod cli;

use std::fs;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::addons::SyncMode;
use crate::github::{validate_repository, ClientOptions, DEFAULT_API_BASE, DEFAULT_USER_AGENT};
use crate::logging::{LogConfig, DEFAULT_LOG_LEVEL};

pub use cli::{CliArgs, USAGE};

/// Repository served when none is configured.
pub const DEFAULT_REPOSITORY: &str = "steeve/xbmctorrent";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default upstream request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum config file size (256KB).
const MAX_FILE_SIZE: u64 = 256 * 1024;

/// Environment variable: listen port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable: comma-separated repositories.
pub const ENV_REPOSITORIES: &str = "XBMC_REPO_REPOSITORIES";
/// Environment variable: GitHub API token.
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
/// Environment variable: log level.
pub const ENV_LOG_LEVEL: &str = "XBMC_REPO_LOG_LEVEL";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// File too large.
    #[error("Config file too large (max {MAX_FILE_SIZE} bytes)")]
    FileTooLarge,

    /// A setting has an unusable value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub repositories to publish ("owner/name").
    pub repositories: Vec<String>,
    /// Address to listen on.
    pub bind_address: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// GitHub API base URL.
    pub api_base: String,
    /// User-Agent for upstream requests.
    pub user_agent: String,
    /// Timeout for each upstream request.
    pub request_timeout_secs: u64,
    /// Background resync period; 0 disables it.
    pub refresh_interval_secs: u64,
    /// Failure policy for synchronization passes.
    pub sync_mode: SyncMode,
    /// GitHub API token.
    pub github_token: Option<String>,
    /// Log level (trace, debug, info, warn, error, off).
    pub log_level: String,
    /// Directory for rolling log files; stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repositories: vec![DEFAULT_REPOSITORY.to_string()],
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            refresh_interval_secs: 0,
            sync_mode: SyncMode::default(),
            github_token: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Returns the default config file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".xbmc-repo")
            .join("config.toml")
    }

    /// Loads configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let metadata = fs::metadata(path)?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(ConfigError::FileTooLarge);
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Applies overrides from a variable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT).filter(|v| !v.trim().is_empty()) {
            self.port = parse_port(&port)?;
        }

        if let Some(repos) = lookup(ENV_REPOSITORIES) {
            let repos = parse_repository_list(&repos);
            if !repos.is_empty() {
                self.repositories = repos;
            }
        }

        if let Some(token) = lookup(ENV_GITHUB_TOKEN).filter(|v| !v.is_empty()) {
            self.github_token = Some(token);
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogConfig::parse_level(&level);
        }

        Ok(())
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repositories.is_empty() {
            return Err(ConfigError::Invalid("no repositories configured".to_string()));
        }

        for repo in &self.repositories {
            validate_repository(repo).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.api_base.is_empty() {
            return Err(ConfigError::Invalid("api_base must not be empty".to_string()));
        }

        Ok(())
    }

    /// Returns the listen address.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// Returns the upstream request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the background resync period, if enabled.
    #[must_use]
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }

    /// Returns the upstream client settings.
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            api_base: self.api_base.clone(),
            user_agent: self.user_agent.clone(),
            timeout: self.request_timeout(),
            token: self.github_token.clone(),
        }
    }

    /// Returns the logging settings.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: LogConfig::parse_level(&self.log_level),
            directory: self.log_dir.clone(),
            ..LogConfig::default()
        }
    }
}

/// Parses a port number.
pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("invalid port '{}'", value)))
}

/// Splits a comma-separated repository list, dropping empty entries.
#[must_use]
pub fn parse_repository_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
