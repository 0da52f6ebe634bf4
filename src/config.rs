//! Runtime configuration for board processes.
//!
//! Settings come either from `KANBAN_*` environment variables or from a
//! JSON file. Unset values fall back to [`BoardConfig::default`].

use crate::board::domain::{BoardDomainError, MovePolicy};
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the database URL.
pub const DATABASE_URL_ENV: &str = "KANBAN_DATABASE_URL";
/// Fallback environment variable for the database URL.
pub const FALLBACK_DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Environment variable for the connection pool size.
pub const POOL_SIZE_ENV: &str = "KANBAN_POOL_SIZE";
/// Environment variable for the log filter.
pub const LOG_LEVEL_ENV: &str = "KANBAN_LOG_LEVEL";
/// Environment variable for the move policy.
pub const MOVE_POLICY_ENV: &str = "KANBAN_MOVE_POLICY";

const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`BoardConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// The pool size is not a positive integer.
    #[error("invalid pool size '{0}', expected a positive integer")]
    InvalidPoolSize(String),

    /// The move policy is not recognised.
    #[error(transparent)]
    InvalidMovePolicy(#[from] BoardDomainError),

    /// No database URL was configured.
    #[error("no database URL configured; set {DATABASE_URL_ENV}")]
    MissingDatabaseUrl,
}

/// Settings shared by every entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Relocation policy enforced by the ordering engine.
    pub move_policy: MovePolicy,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            pool_size: DEFAULT_POOL_SIZE,
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            move_policy: MovePolicy::default(),
        }
    }
}

impl BoardConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let database_url = lookup(DATABASE_URL_ENV)
            .or_else(|| lookup(FALLBACK_DATABASE_URL_ENV))
            .filter(|url| !url.trim().is_empty());
        let pool_size = lookup(POOL_SIZE_ENV)
            .map(|raw| parse_pool_size(&raw))
            .transpose()?
            .unwrap_or(defaults.pool_size);
        let log_level = lookup(LOG_LEVEL_ENV).unwrap_or(defaults.log_level);
        let move_policy = lookup(MOVE_POLICY_ENV)
            .map(|raw| MovePolicy::try_from(raw.as_str()))
            .transpose()?
            .unwrap_or(defaults.move_policy);
        Ok(Self {
            database_url,
            pool_size,
            log_level,
            move_policy,
        })
    }

    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read,
    /// [`ConfigError::Parse`] when it is malformed, and
    /// [`ConfigError::InvalidPoolSize`] for a zero pool size.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let read_error = |source: std::io::Error| ConfigError::Read {
            path: path.to_string(),
            source,
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| read_error(std::io::Error::other("path must include a file name")))?;
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
        let contents = dir.read_to_string(file_name).map_err(read_error)?;

        let config: Self = serde_json::from_str(&contents)?;
        if config.pool_size == 0 {
            return Err(ConfigError::InvalidPoolSize(config.pool_size.to_string()));
        }
        Ok(config)
    }

    /// Returns the configured database URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when none is set.
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseUrl)
    }
}

fn parse_pool_size(raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidPoolSize(raw.to_owned())),
    }
}
