//! # Service Configuration
//!
//! Settings an embedder needs to wire the orchestration core: database
//! connection, side-effect timeout budgets, and the optional user directory
//! endpoint.
//!
//! ## Overview
//!
//! Every section has working defaults, so `OrchestratorConfig::default()` is
//! a runnable local setup. Two loading paths layer on top of that:
//!
//! - [`OrchestratorConfig::from_env`] reads flat `TASKLANE_*` variables,
//!   which is how the deployed service is configured
//! - [`OrchestratorConfig::from_file`] reads a structured file (format
//!   inferred from the extension) and then applies `TASKLANE__*` overrides,
//!   for setups that keep per-environment files in the repo
//!
//! Malformed values fail loading with a [`ConfigError`] naming the variable
//! rather than silently falling back to a default.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::clients::GrpcClientConfig;
use crate::constants::timeouts;

/// Errors raised while assembling configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable was present but could not be parsed
    #[error("invalid value for {variable}: {message}")]
    InvalidEnvValue { variable: String, message: String },

    /// A file or layered source failed to load or deserialize
    #[error("configuration source error: {0}")]
    Source(#[from] config::ConfigError),
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Connection pool size
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/tasklane_development".to_string(),
            pool_size: 10,
        }
    }
}

/// Timeout budgets for best-effort side effects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SideEffectConfig {
    /// Milliseconds allotted to inline analytics tracking
    pub analytics_timeout_ms: u64,
    /// Milliseconds allotted to a detached notification publish
    pub publish_timeout_ms: u64,
}

impl Default for SideEffectConfig {
    fn default() -> Self {
        Self {
            analytics_timeout_ms: timeouts::ANALYTICS_TRACK.as_millis() as u64,
            publish_timeout_ms: timeouts::EVENT_PUBLISH.as_millis() as u64,
        }
    }
}

impl SideEffectConfig {
    pub fn analytics_timeout(&self) -> Duration {
        Duration::from_millis(self.analytics_timeout_ms)
    }

    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_timeout_ms)
    }
}

/// User directory endpoint settings.
///
/// An empty endpoint means no directory is deployed; the orchestrator then
/// runs without the ownership gate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// gRPC endpoint of the user service; empty disables the directory
    pub endpoint: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Connection establishment timeout in milliseconds
    pub connect_timeout_ms: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_ms: timeouts::DIRECTORY_LOOKUP.as_millis() as u64,
            connect_timeout_ms: 10_000,
        }
    }
}

impl DirectoryConfig {
    /// Whether a directory endpoint is configured at all.
    pub fn is_enabled(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }

    /// Channel configuration for the directory client.
    pub fn client_config(&self) -> GrpcClientConfig {
        GrpcClientConfig::new(self.endpoint.clone())
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_connect_timeout(Duration::from_millis(self.connect_timeout_ms))
    }
}

/// Top-level configuration for embedding the orchestration core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub database: DatabaseConfig,
    pub side_effects: SideEffectConfig,
    pub directory: DirectoryConfig,
}

impl OrchestratorConfig {
    /// Build configuration from `TASKLANE_*` environment variables.
    ///
    /// Unset variables keep their defaults; a set-but-malformed variable is
    /// a hard error so typos never run with silently wrong settings.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("TASKLANE_DATABASE_URL") {
            config.database.url = url;
        }
        if let Ok(raw) = std::env::var("TASKLANE_DATABASE_POOL_SIZE") {
            config.database.pool_size = parse_env_value("TASKLANE_DATABASE_POOL_SIZE", &raw)?;
        }
        if let Ok(raw) = std::env::var("TASKLANE_ANALYTICS_TIMEOUT_MS") {
            config.side_effects.analytics_timeout_ms =
                parse_env_value("TASKLANE_ANALYTICS_TIMEOUT_MS", &raw)?;
        }
        if let Ok(raw) = std::env::var("TASKLANE_PUBLISH_TIMEOUT_MS") {
            config.side_effects.publish_timeout_ms =
                parse_env_value("TASKLANE_PUBLISH_TIMEOUT_MS", &raw)?;
        }
        if let Ok(endpoint) = std::env::var("TASKLANE_DIRECTORY_ENDPOINT") {
            config.directory.endpoint = endpoint;
        }
        if let Ok(raw) = std::env::var("TASKLANE_DIRECTORY_TIMEOUT_MS") {
            config.directory.timeout_ms =
                parse_env_value("TASKLANE_DIRECTORY_TIMEOUT_MS", &raw)?;
        }

        Ok(config)
    }

    /// Load configuration from a file, then apply environment overrides.
    ///
    /// The file format is inferred from the extension. Overrides use a
    /// double-underscore path separator, e.g. `TASKLANE__DATABASE__URL`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("TASKLANE").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

fn parse_env_value<T>(variable: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|err: T::Err| ConfigError::InvalidEnvValue {
        variable: variable.to_string(),
        message: err.to_string(),
    })
}
