//! Service configuration.
//!
//! Configuration is read from an optional TOML file and then overridden by
//! `TASKGATE_*` environment variables. Every field has a default, so an empty
//! file is valid apart from the signing secret, which must always be set.
//!
//! ```toml
//! bind_address = "0.0.0.0:8000"
//! log_level = "debug"
//!
//! [storage]
//! backend = "postgres"
//! database_url = "postgres://taskgate@localhost/taskgate"
//!
//! [auth]
//! signing_secret = "change-me"
//!
//! [[auth.users]]
//! username = "alice"
//! password = "wonderland"
//! ```

use crate::auth::adapters::TokenLifetimes;
use crate::task::validation::{SpecialTitlePolicy, TaskValidationConfig};
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding [`AppConfig::bind_address`].
pub const ENV_BIND_ADDRESS: &str = "TASKGATE_BIND_ADDRESS";
/// Environment variable overriding [`AppConfig::log_level`].
pub const ENV_LOG_LEVEL: &str = "TASKGATE_LOG_LEVEL";
/// Environment variable selecting `PostgreSQL` storage at the given URL.
pub const ENV_DATABASE_URL: &str = "TASKGATE_DATABASE_URL";
/// Environment variable overriding [`AuthConfig::signing_secret`].
pub const ENV_SIGNING_SECRET: &str = "TASKGATE_SIGNING_SECRET";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_ACCESS_LIFETIME_SECS: u64 = 5 * 60;
const DEFAULT_REFRESH_LIFETIME_SECS: u64 = 24 * 60 * 60;

/// Errors raised while loading or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`AppConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is present but unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Task storage backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Process-local storage; tasks are lost on restart.
    #[default]
    Memory,
    /// `PostgreSQL` storage (requires the `postgres` cargo feature).
    Postgres {
        /// Connection URL.
        database_url: String,
        /// Maximum pooled connections.
        #[serde(default = "default_pool_size")]
        pool_size: u32,
    },
}

const fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

/// Account accepted by the token endpoint.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct UserCredentials {
    /// Login name.
    pub username: String,
    /// Plain-text password; hashed when the directory is built.
    pub password: String,
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Token signing and account settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens.
    pub signing_secret: String,
    /// Access token lifetime in seconds.
    pub access_token_lifetime_secs: u64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_lifetime_secs: u64,
    /// Accounts that may obtain tokens.
    pub users: Vec<UserCredentials>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_secret: String::new(),
            access_token_lifetime_secs: DEFAULT_ACCESS_LIFETIME_SECS,
            refresh_token_lifetime_secs: DEFAULT_REFRESH_LIFETIME_SECS,
            users: Vec::new(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_lifetime_secs", &self.access_token_lifetime_secs)
            .field("refresh_token_lifetime_secs", &self.refresh_token_lifetime_secs)
            .field("users", &self.users)
            .finish_non_exhaustive()
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Socket address the HTTP server listens on.
    pub bind_address: String,
    /// Default tracing filter directive; `RUST_LOG` takes precedence.
    pub log_level: String,
    /// Log line format.
    pub log_format: LogFormat,
    /// Task storage backend.
    pub storage: StorageConfig,
    /// Token and account settings.
    pub auth: AuthConfig,
    /// Task creation rule parameters.
    pub validation: TaskValidationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            log_format: LogFormat::default(),
            storage: StorageConfig::default(),
            auth: AuthConfig::default(),
            validation: TaskValidationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or mistyped values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Loads configuration from `path`, or defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is not valid configuration.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(config_path) = path else {
            return Ok(Self::default());
        };
        let source = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Applies `TASKGATE_*` overrides resolved through `lookup`.
    ///
    /// `lookup` is usually `|key| std::env::var(key).ok()`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind_address) = lookup(ENV_BIND_ADDRESS) {
            self.bind_address = bind_address;
        }
        if let Some(log_level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = log_level;
        }
        if let Some(database_url) = lookup(ENV_DATABASE_URL) {
            let pool_size = match &self.storage {
                StorageConfig::Postgres { pool_size, .. } => *pool_size,
                StorageConfig::Memory => DEFAULT_POOL_SIZE,
            };
            self.storage = StorageConfig::Postgres {
                database_url,
                pool_size,
            };
        }
        if let Some(secret) = lookup(ENV_SIGNING_SECRET) {
            self.auth.signing_secret = secret;
        }
    }

    /// Checks values that deserialization alone cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first unusable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        self.token_lifetimes()?;
        if self.auth.signing_secret.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "auth.signing_secret must be set (or {ENV_SIGNING_SECRET})"
            )));
        }
        if let StorageConfig::Postgres {
            database_url,
            pool_size,
        } = &self.storage
        {
            if database_url.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "storage.database_url must not be empty".to_owned(),
                ));
            }
            if *pool_size == 0 {
                return Err(ConfigError::Invalid(
                    "storage.pool_size must be positive".to_owned(),
                ));
            }
        }
        SpecialTitlePolicy::new(&self.validation.special_title_pattern).map_err(|err| {
            ConfigError::Invalid(format!("validation.special_title_pattern: {err}"))
        })?;
        Ok(())
    }

    /// Parses [`AppConfig::bind_address`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_address.parse().map_err(|err| {
            ConfigError::Invalid(format!("bind_address '{}': {err}", self.bind_address))
        })
    }

    /// Converts the configured lifetimes for the token service.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero or out-of-range lifetimes.
    pub fn token_lifetimes(&self) -> Result<TokenLifetimes, ConfigError> {
        Ok(TokenLifetimes {
            access_secs: lifetime_secs(
                "auth.access_token_lifetime_secs",
                self.auth.access_token_lifetime_secs,
            )?,
            refresh_secs: lifetime_secs(
                "auth.refresh_token_lifetime_secs",
                self.auth.refresh_token_lifetime_secs,
            )?,
        })
    }
}

fn lifetime_secs(name: &str, value: u64) -> Result<i64, ConfigError> {
    match i64::try_from(value) {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::Invalid(format!(
            "{name} must be between 1 and {}",
            i64::MAX
        ))),
    }
}
