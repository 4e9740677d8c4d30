//! Store configuration.
//!
//! # Responsibility
//! - Describe where the message database lives and how connections behave.
//! - Carry logging bootstrap parameters for hosts that embed the store.
//!
//! # Invariants
//! - Every field has a default, so an empty source yields a usable config.
//! - `db_path = None` selects an in-memory database.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "MSGSTORE_DB_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "MSGSTORE_BUSY_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "MSGSTORE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "MSGSTORE_LOG_DIR";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// SQLite takes the busy timeout as `i32` milliseconds.
pub const MAX_BUSY_TIMEOUT_MS: u64 = i32::MAX as u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for `{key}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Connection and logging settings for the message store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite file path. `None` opens an in-memory database.
    pub db_path: Option<PathBuf>,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout_ms: u64,
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` leaves logging off.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Builds a config from `MSGSTORE_*` environment variables over defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup over defaults.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = read(ENV_BUSY_TIMEOUT_MS) {
            config.busy_timeout_ms = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms <= MAX_BUSY_TIMEOUT_MS)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_BUSY_TIMEOUT_MS,
                    value: raw.clone(),
                })?;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    /// Busy timeout capped at `MAX_BUSY_TIMEOUT_MS`; deserialized configs
    /// bypass the `from_lookup` bound.
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms.min(MAX_BUSY_TIMEOUT_MS))
    }
}
