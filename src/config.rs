use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Data source constants
// =============================================================================

/// Base URL of the endoflife.date API
pub const DEFAULT_BASE_URL: &str = "https://endoflife.date/api";

/// Resource listing every known technology identifier
pub const ALL_TECHNOLOGIES_RESOURCE: &str = "all.json";

// =============================================================================
// Cache constants
// =============================================================================

/// Day key format used in snapshot file names (month-day-year)
pub const CACHE_DAY_FORMAT: &str = "%m-%d-%Y";

/// File name prefix of the known technologies snapshot
pub const TECHNOLOGY_LIST_PREFIX: &str = "all-technologies";

/// File name prefix of the daily error log
pub const ERROR_LOG_PREFIX: &str = "eoldate-error-log";

const APP_DIR_NAME: &str = "eoldate";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application configuration, read from `config.json` in the config directory
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Base URL of the lifecycle API
    pub base_url: String,
    /// HTTP timeout in seconds; the transport default applies when unset
    pub timeout_secs: Option<u64>,
    /// Overrides the snapshot directory
    pub cache_dir: Option<PathBuf>,
    /// Overrides the error log directory
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            cache_dir: None,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Load the configuration file at `path`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `config.json` from the default config directory
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&config_path())
    }

    /// Snapshot directory, honoring the `cacheDir` override
    pub fn resolved_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(cache_dir)
    }

    /// Error log directory, honoring the `logDir` override
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(log_dir)
    }
}

/// Returns the path to the config directory for eoldate.
/// Uses $XDG_CONFIG_HOME/eoldate if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/eoldate,
/// or ./eoldate if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the optional configuration file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Returns the directory holding the daily snapshots.
pub fn cache_dir() -> PathBuf {
    config_dir().join("cache")
}

/// Returns the directory holding the daily error logs.
pub fn log_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    expand_home_with(path, dirs::home_dir())
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join(APP_DIR_NAME)
}

fn expand_home_with(path: &Path, home_dir: Option<PathBuf>) -> PathBuf {
    let Some(home) = home_dir else {
        return path.to_path_buf();
    };

    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
