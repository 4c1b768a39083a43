//! Error types for dnscache
//!
//! The cache itself has no recoverable error states: a miss is `None`, not an
//! error. Errors only arise when a cache is misconfigured (zero capacity),
//! when configuration cannot be loaded, or when [`crate::init`] cannot set up
//! the requested log output.

use thiserror::Error;

use crate::logging::LogError;

/// Result type alias using the library's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for dnscache
#[derive(Error, Debug)]
pub enum Error {
    /// A cache was constructed with parameters that make eviction undefined.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Log output requested by the config could not be set up.
    #[error("logging error: {0}")]
    Logging(#[from] LogError),
}

impl Error {
    pub(crate) fn zero_capacity() -> Self {
        Self::InvalidConfiguration("cache capacity must be at least 1, got 0".to_string())
    }

    /// Short hint describing how to resolve the error.
    #[must_use]
    pub fn hint(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "Construct the cache with a capacity of at least 1.",
            Self::Config(err) => err.hint(),
            Self::Logging(LogError::InvalidLevel(_)) => {
                "Use a level such as \"info\" or a filter such as \"dnscache=debug\"."
            }
            Self::Logging(LogError::OpenFile { .. }) => {
                "Point [logging].file at a writable location, or remove it."
            }
            Self::Logging(_) => "Install logging once per process, before creating caches.",
        }
    }

    /// Whether the error was caused by a bad capacity or config value
    /// (as opposed to an environment failure such as an unreadable file).
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration(_)
                | Self::Config(ConfigError::ValidationError(_))
                | Self::Logging(LogError::InvalidLevel(_))
        )
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file {0}: {1}")]
    ReadFailed(String, String),

    #[error("Failed to parse config: {0}")]
    ParseFailed(String),

    #[error("Failed to serialize config: {0}")]
    SerializeFailed(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ConfigError {
    #[must_use]
    pub fn hint(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "Verify the config path and retry.",
            Self::ReadFailed(_, _) => "Ensure the config file is readable by the current user.",
            Self::ParseFailed(_) => "Fix the TOML syntax and retry.",
            Self::SerializeFailed(_) => "Recreate the config from known-good defaults.",
            Self::ValidationError(_) => "Fix the invalid fields and retry.",
        }
    }
}
