//! Subscriber setup for the cache's `tracing` events
//!
//! The cache only emits events. Applications that already install a
//! subscriber need nothing from this module; others can hand the
//! `[logging]` section of a [`crate::CacheConfig`] to [`init_logging`], or
//! call [`crate::init`] to do that and build the cache in one step.
//!
//! Events carry these fields:
//! - `capacity`, `size`: cache bounds when the event fired
//! - `name`: hostname being resolved or updated (`trace` only)
//! - `evicted`: hostname displaced by an insertion into a full cache
//!
//! Addresses never appear in events.

use std::fs::{File, OpenOptions};
use std::io;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

pub use crate::config::LogFormat;

/// Config of the subscriber installed by [`init_logging`], once there is one.
static INSTALLED: OnceLock<LogConfig> = OnceLock::new();

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// `[logging]` section of the cache config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// A level (`debug`) or a filter directive (`dnscache=trace,warn`).
    /// `RUST_LOG` wins when set.
    pub level: String,

    pub format: LogFormat,

    /// Also append events to this file, created 0600 in a 0700 directory.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("logging already initialized")]
    AlreadyInitialized,

    #[error("invalid log filter {0:?}")]
    InvalidLevel(String),

    #[error("cannot open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("another global subscriber is already installed: {0}")]
    Install(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install a global subscriber built from `config`.
///
/// Fails with [`LogError::AlreadyInitialized`] after a successful call, and
/// with [`LogError::Install`] when something else already set the global
/// default.
pub fn init_logging(config: &LogConfig) -> Result<(), LogError> {
    if INSTALLED.get().is_some() {
        return Err(LogError::AlreadyInitialized);
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => filter_for(&config.level)?,
    };
    let log_file = config.file.as_deref().map(open_log_file).transpose()?;

    let subscriber = tracing_subscriber::registry()
        .with(layers_for(config.format, log_file))
        .with(filter);
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = INSTALLED.set(config.clone());

    tracing::info!(
        level = %config.level,
        format = %config.format,
        file = ?config.file,
        "Logging initialized"
    );
    Ok(())
}

/// The config passed to the [`init_logging`] call that installed the
/// global subscriber.
pub fn installed_config() -> Option<&'static LogConfig> {
    INSTALLED.get()
}

fn filter_for(level: &str) -> Result<EnvFilter, LogError> {
    EnvFilter::try_new(level).map_err(|_| LogError::InvalidLevel(level.to_string()))
}

/// One stderr layer, plus a layer for `log_file` when given. The file
/// layer never writes ANSI colors.
fn layers_for(format: LogFormat, log_file: Option<File>) -> Vec<BoxedLayer> {
    let mut layers = vec![match format {
        LogFormat::Pretty => fmt::layer().with_writer(io::stderr).boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(io::stderr)
            .boxed(),
    }];

    if let Some(file) = log_file {
        let writer = Mutex::new(file);
        layers.push(match format {
            LogFormat::Pretty => fmt::layer().with_ansi(false).with_writer(writer).boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .flatten_event(true)
                .with_writer(writer)
                .boxed(),
        });
    }
    layers
}

fn open_log_file(path: &Path) -> Result<File, LogError> {
    let open_failed = |source| LogError::OpenFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(open_failed)?;
            #[cfg(unix)]
            std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))
                .map_err(open_failed)?;
        }
    }

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    options.mode(0o600);
    options.open(path).map_err(open_failed)
}
