//! Bootstrap configuration loading
//!
//! Settings sources, highest priority first:
//! 1. Command-line arguments / environment variables (applied by the binary)
//! 2. TOML configuration file
//! 3. Built-in defaults
//!
//! A missing TOML file is not an error: defaults are used and a warning is
//! logged.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5780;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Interface to bind the HTTP server to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Enables debug-only behavior such as the `fake-today` override
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub cover: CoverConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Cover image compositor settings
#[derive(Debug, Clone, Deserialize)]
pub struct CoverConfig {
    /// TTF/OTF font used for the caption; no caption text without it
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    /// Timeout for downloading the source cover image
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            bind_addr: default_bind_addr(),
            port: default_port(),
            debug: false,
            logging: LoggingConfig::default(),
            cover: CoverConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_database_path() -> PathBuf {
    default_data_folder().join("hottrack.db")
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

/// OS-dependent data folder (`~/.local/share/hottrack` on Linux)
pub fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("hottrack"))
        .unwrap_or_else(|| PathBuf::from("./hottrack_data"))
}

/// Default config file location (`~/.config/hottrack/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("hottrack").join("config.toml"))
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load configuration from `path`
    ///
    /// A missing file yields defaults; an unreadable or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `path` if given, otherwise from the default location
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) => Self::load(&path),
                None => {
                    warn!("Could not determine config directory, using built-in defaults");
                    Ok(Self::default())
                }
            },
        }
    }
}
