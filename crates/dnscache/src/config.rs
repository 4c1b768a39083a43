//! Configuration for dnscache
//!
//! A cache is configured with a fixed capacity and a logging section. Both can
//! be loaded from TOML:
//!
//! ```toml
//! capacity = 4096
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! file = "/var/log/dnscache.log"
//! ```
//!
//! Every field has a default, so an empty document is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::logging::LogConfig;

/// Capacity used when a config omits it.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-friendly colored output
    #[default]
    Pretty,
    /// JSON lines, one event per line
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "unknown log format: {s}. Expected one of: pretty, json"
            )),
        }
    }
}

/// Top-level cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of hostname entries. Must be at least 1.
    pub capacity: usize,

    /// Logging setup
    pub logging: LogConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            logging: LogConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Parse a configuration from a TOML document and validate it.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(input).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(path.display().to_string(), e.to_string()))?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            capacity = config.capacity,
            "Loaded cache config"
        );
        Ok(config)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeFailed(e.to_string()))
    }

    /// Check values that would make the cache or logger unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "capacity must be at least 1".to_string(),
            ));
        }
        let level = self.logging.level.as_str();
        // RUST_LOG-style directives ("dnscache=debug,warn") are also accepted.
        let is_directive = level.contains('=') || level.contains(',');
        if !is_directive && level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::ValidationError(format!(
                "unknown log level {level:?}, expected trace, debug, info, warn or error"
            )));
        }
        Ok(())
    }
}
