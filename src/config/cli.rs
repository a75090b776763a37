//! Command-line argument parsing.

use std::path::PathBuf;

use super::{parse_port, Config, ConfigError};

/// Usage text printed by `--help`.
pub const USAGE: &str = "\
Usage: xbmc-repo [OPTIONS] [OWNER/NAME ...]

Serves the releases of the given GitHub repositories as an XBMC/Kodi add-on
repository.

Options:
  --config <PATH>   Read settings from PATH instead of ~/.xbmc-repo/config.toml
  --port <PORT>     Listen on PORT (overrides $PORT)
  --version, -v     Show version
  --help, -h        Show this help
";

/// Parsed command-line arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// `--version` was given.
    pub version: bool,
    /// `--help` was given.
    pub help: bool,
    /// Explicit config file.
    pub config_path: Option<PathBuf>,
    /// Explicit listen port.
    pub port: Option<u16>,
    /// Repositories given as positional arguments.
    pub repositories: Vec<String>,
}

impl CliArgs {
    /// Parses arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--version" | "-v" => parsed.version = true,
                "--help" | "-h" => parsed.help = true,
                "--config" => {
                    let path = args.next().ok_or_else(|| missing_value("--config"))?;
                    parsed.config_path = Some(PathBuf::from(path));
                }
                "--port" => {
                    let port = args.next().ok_or_else(|| missing_value("--port"))?;
                    parsed.port = Some(parse_port(&port)?);
                }
                flag if flag.starts_with('-') => {
                    return Err(ConfigError::Invalid(format!("unknown option '{}'", flag)));
                }
                repository => parsed.repositories.push(repository.to_string()),
            }
        }

        Ok(parsed)
    }

    /// Applies the flags that override configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if !self.repositories.is_empty() {
            config.repositories.clone_from(&self.repositories);
        }
    }
}

fn missing_value(flag: &str) -> ConfigError {
    ConfigError::Invalid(format!("{} requires a value", flag))
}
