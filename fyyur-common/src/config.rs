//! Configuration loading and database location resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the database file or URL
pub const DATABASE_ENV_VAR: &str = "FYYUR_DATABASE";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; command-line arguments and environment
/// variables take precedence over anything set here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Database file path or `sqlite:` URL
    #[serde(default)]
    pub database: Option<String>,

    /// HTTP bind host
    #[serde(default)]
    pub host: Option<String>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is unset (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Optional log file, written alongside stdout
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Config file to read: the explicit path if given, else the platform
    /// default when it exists
    ///
    /// An explicit path is returned even when missing so the caller can
    /// report it; a missing default file simply means "no config".
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|path| path.exists()),
        }
    }
}

/// Where the relational store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// A file path, created on first use
    Path(PathBuf),
    /// A complete `sqlite:` connection string, used verbatim
    Url(String),
}

impl DatabaseLocation {
    /// Interpret a configured value: `sqlite:` prefixes are URLs, anything else a path
    pub fn from_setting(value: &str) -> Self {
        if value.starts_with("sqlite:") {
            DatabaseLocation::Url(value.to_string())
        } else {
            DatabaseLocation::Path(PathBuf::from(value))
        }
    }

    /// Connection string for sqlx
    pub fn connect_url(&self) -> String {
        match self {
            DatabaseLocation::Path(path) => format!("sqlite://{}?mode=rwc", path.display()),
            DatabaseLocation::Url(url) => url.clone(),
        }
    }

    /// In-memory databases vanish with their connection
    pub fn is_memory(&self) -> bool {
        match self {
            DatabaseLocation::Path(_) => false,
            DatabaseLocation::Url(url) => url.contains(":memory:") || url.contains("mode=memory"),
        }
    }
}

impl std::fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseLocation::Path(path) => write!(f, "{}", path.display()),
            DatabaseLocation::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Database location resolution, priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_database(cli_arg: Option<&str>, toml_config: &TomlConfig) -> DatabaseLocation {
    // Priority 1: Command-line argument
    if let Some(value) = cli_arg {
        return DatabaseLocation::from_setting(value);
    }

    // Priority 2: Environment variable
    if let Ok(value) = std::env::var(DATABASE_ENV_VAR) {
        if !value.trim().is_empty() {
            return DatabaseLocation::from_setting(&value);
        }
    }

    // Priority 3: TOML config file
    if let Some(value) = toml_config.database.as_deref() {
        return DatabaseLocation::from_setting(value);
    }

    // Priority 4: OS-dependent compiled default
    DatabaseLocation::Path(default_database_path())
}

/// Default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fyyur").join("config.toml"))
}

/// OS-dependent default database file
pub fn default_database_path() -> PathBuf {
    // ~/.local/share/fyyur, ~/Library/Application Support/fyyur, %LOCALAPPDATA%\fyyur
    dirs::data_local_dir()
        .map(|d| d.join("fyyur").join("fyyur.db"))
        .unwrap_or_else(|| PathBuf::from("./fyyur_data/fyyur.db"))
}
