//! Environment-driven runtime settings.
//!
//! # Responsibility
//! - Resolve database location and logging settings from `TOYSHOP_*` keys.
//! - Report missing connection setup and malformed settings uniformly.
//!
//! # Invariants
//! - Parsing never touches the filesystem; it only validates shape.
//! - `log_dir`, when present, is an absolute path.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DB_PATH_KEY: &str = "TOYSHOP_DB_PATH";
pub const LOG_LEVEL_KEY: &str = "TOYSHOP_LOG_LEVEL";
pub const LOG_DIR_KEY: &str = "TOYSHOP_LOG_DIR";

pub const DEFAULT_DB_FILE_NAME: &str = "toyshop.sqlite3";
pub const IN_MEMORY_DB_PATH: &str = ":memory:";

/// Configuration-level failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A repository asked for the shared connection before one was set.
    MissingConnection,
    /// A setting is present but cannot be used.
    InvalidSetting {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingConnection => write!(
                f,
                "database connection is not configured; set it on the connection provider first"
            ),
            Self::InvalidSetting { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigurationError {}

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    InMemory,
}

/// Resolved process settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db: DbLocation,
    pub log_level: &'static str,
    /// Logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db: DbLocation::File(PathBuf::from(DEFAULT_DB_FILE_NAME)),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    /// - Returns `InvalidSetting` when a present key has an unusable value.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    ///
    /// Blank values are treated the same as absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(path) = read(DB_PATH_KEY) {
            config.db = if path == IN_MEMORY_DB_PATH {
                DbLocation::InMemory
            } else {
                DbLocation::File(PathBuf::from(path))
            };
        }

        if let Some(level) = read(LOG_LEVEL_KEY) {
            config.log_level =
                normalize_level(&level).map_err(|reason| ConfigurationError::InvalidSetting {
                    key: LOG_LEVEL_KEY,
                    value: level.clone(),
                    reason,
                })?;
        }

        if let Some(dir) = read(LOG_DIR_KEY) {
            if !Path::new(&dir).is_absolute() {
                return Err(ConfigurationError::InvalidSetting {
                    key: LOG_DIR_KEY,
                    value: dir,
                    reason: "log directory must be an absolute path".to_string(),
                });
            }
            config.log_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }
}
