//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database location and logging settings once at startup.
//! - Keep resolution testable without mutating the process environment.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Logging stays disabled unless a log directory is configured.

use crate::logging::{default_log_level, LogLevel, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "PROJECTDESK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "PROJECTDESK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PROJECTDESK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "projectdesk.sqlite3";

/// Settings needed to bootstrap a project service process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    /// Absolute log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    /// A variable is set but its value cannot be used.
    InvalidValue {
        key: &'static str,
        source: LoggingError,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, source } => write!(f, "invalid {key}: {source}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidValue { source, .. } => Some(source),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl ServiceConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let non_blank = |key| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = non_blank(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_blank(ENV_LOG_LEVEL) {
            config.log_level = level
                .parse()
                .map_err(|source| ConfigError::InvalidValue {
                    key: ENV_LOG_LEVEL,
                    source,
                })?;
        }
        config.log_dir = non_blank(ENV_LOG_DIR).map(PathBuf::from);

        Ok(config)
    }
}
