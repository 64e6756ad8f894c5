//! Configuration loading
//!
//! A small TOML bootstrap file plus per-value overrides. Resolution order
//! for every value:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error: the binaries log a warning and
//! start with compiled defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Points at an explicit config file
pub const CONFIG_ENV_VAR: &str = "WHINV_CONFIG";
pub const DATABASE_ENV_VAR: &str = "WHINV_DATABASE";
pub const PORT_ENV_VAR: &str = "WHINV_PORT";
pub const IMPORT_SOURCE_ENV_VAR: &str = "WHINV_IMPORT_SOURCE";
pub const URL_ENV_VAR: &str = "WHINV_URL";

pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_SHEET: &str = "AISLE E Parts table";
pub const DEFAULT_IMPORT_SOURCE: &str = "AISLEMAPPING.xlsx";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub client: ClientConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Spreadsheet import settings
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub source_path: Option<PathBuf>,

    #[serde(default = "default_sheet")]
    pub sheet: String,

    /// Title rows at the top of the sheet
    #[serde(default = "default_header_rows")]
    pub header_rows: usize,
}

/// Console client settings
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sheet() -> String {
    DEFAULT_SHEET.to_string()
}

fn default_header_rows() -> usize {
    2
}

fn default_base_url() -> String {
    format!("http://127.0.0.1:{}", DEFAULT_PORT)
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            host: default_host(),
            port: default_port(),
            logging: LoggingConfig::default(),
            import: ImportConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            source_path: None,
            sheet: default_sheet(),
            header_rows: default_header_rows(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl TomlConfig {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load the config file if one can be found
    ///
    /// Returns the path that was loaded, or `None` when compiled defaults are
    /// in use. A file that exists but fails to parse is an error.
    pub fn load() -> Result<(Self, Option<PathBuf>)> {
        match config_file_path() {
            Some(path) => Ok((Self::from_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Database path: CLI > `WHINV_DATABASE` > TOML > OS default
    pub fn resolve_database_path(&self, cli_arg: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_arg {
            return path.to_path_buf();
        }

        if let Some(path) = env_value(DATABASE_ENV_VAR) {
            return PathBuf::from(path);
        }

        self.database_path
            .clone()
            .unwrap_or_else(default_database_path)
    }

    /// HTTP port: CLI > `WHINV_PORT` > TOML/default
    pub fn resolve_port(&self, cli_arg: Option<u16>) -> Result<u16> {
        if let Some(port) = cli_arg {
            return Ok(port);
        }

        match env_value(PORT_ENV_VAR) {
            Some(value) => value.parse().map_err(|_| {
                Error::Config(format!("{} is not a valid port: {}", PORT_ENV_VAR, value))
            }),
            None => Ok(self.port),
        }
    }

    /// Spreadsheet path: `WHINV_IMPORT_SOURCE` > TOML > `AISLEMAPPING.xlsx`
    pub fn resolve_import_source(&self) -> PathBuf {
        env_value(IMPORT_SOURCE_ENV_VAR)
            .map(PathBuf::from)
            .or_else(|| self.import.source_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMPORT_SOURCE))
    }

    /// Server URL for the console: CLI > `WHINV_URL` > TOML/default
    pub fn resolve_base_url(&self, cli_arg: Option<&str>) -> String {
        cli_arg
            .map(str::to_string)
            .or_else(|| env_value(URL_ENV_VAR))
            .unwrap_or_else(|| self.client.base_url.clone())
    }
}

/// Locate the config file
///
/// `WHINV_CONFIG` wins; otherwise `<config_dir>/whinv/config.toml`, then
/// `/etc/whinv/config.toml`. `None` when no file exists.
pub fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = env_value(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("whinv").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    let system_config = PathBuf::from("/etc/whinv/config.toml");
    if system_config.exists() {
        return Some(system_config);
    }

    None
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("whinv"))
        .unwrap_or_else(|| PathBuf::from("./whinv_data"))
        .join("whinv.db")
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
