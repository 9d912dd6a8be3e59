//! Configuration management.
//!
//! Configuration is read fresh on every invocation and passed down as an
//! immutable snapshot; nothing here is cached in globals.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MNEMEX_DATA_DIR";

/// Lock manager tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockSettings {
    /// Age after which a foreign lock file is treated as a crash leftover.
    pub stale_after: Duration,
    /// Sleep between acquisition attempts while the lock is contended.
    pub poll_interval: Duration,
    /// Total time to wait for the lock before failing.
    pub acquire_timeout: Duration,
}

impl Default for LockSettings {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(30),
            poll_interval: Duration::from_millis(50),
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Main configuration for mnemex.
#[derive(Debug, Clone)]
pub struct MnemexConfig {
    /// Directory holding the domain files.
    pub data_dir: PathBuf,
    /// Default retrieval budget when the caller does not pass one.
    pub default_budget: Option<usize>,
    /// Lock manager tuning.
    pub lock: LockSettings,
}

impl MnemexConfig {
    /// Loads configuration.
    ///
    /// Precedence, lowest to highest: built-in defaults, the config file
    /// (explicit `path` or the platform default location), then the
    /// `MNEMEX_DATA_DIR` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named config file is missing or
    /// unparseable. A missing file at the default location is fine.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => read_config_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => read_config_file(&path)?,
                _ => ConfigFile::default(),
            },
        };
        Ok(Self::from_file(file))
    }

    /// Builds a config snapshot from a parsed file plus environment.
    fn from_file(file: ConfigFile) -> Self {
        let defaults = LockSettings::default();
        let lock = file.lock.unwrap_or_default();

        let data_dir = std::env::var(DATA_DIR_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(|| file.data_dir.map(PathBuf::from))
            .unwrap_or_else(default_data_dir);

        Self {
            data_dir,
            default_budget: file.default_budget,
            lock: LockSettings {
                stale_after: lock
                    .stale_after_secs
                    .map_or(defaults.stale_after, Duration::from_secs),
                poll_interval: lock
                    .poll_interval_ms
                    .map_or(defaults.poll_interval, Duration::from_millis),
                acquire_timeout: lock
                    .acquire_timeout_secs
                    .map_or(defaults.acquire_timeout, Duration::from_secs),
            },
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Data directory holding domain files.
    pub data_dir: Option<String>,
    /// Default retrieval budget in tokens.
    pub default_budget: Option<usize>,
    /// Lock tuning section.
    pub lock: Option<ConfigFileLock>,
}

/// Lock section in the config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLock {
    /// Staleness window in seconds.
    pub stale_after_secs: Option<u64>,
    /// Poll interval in milliseconds.
    pub poll_interval_ms: Option<u64>,
    /// Acquisition timeout in seconds.
    pub acquire_timeout_secs: Option<u64>,
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
        operation: "read_config_file".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;
    toml::from_str(&text).map_err(|e| Error::OperationFailed {
        operation: "parse_config_file".to_string(),
        cause: format!("{}: {e}", path.display()),
    })
}

/// Default config file location (`<config dir>/mnemex/config.toml`).
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "mnemex")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Default data directory (`<data dir>/mnemex/domains`).
fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "mnemex").map_or_else(
        || PathBuf::from(".mnemex/domains"),
        |dirs| dirs.data_dir().join("domains"),
    )
}
