//! dnscache: bounded, thread-safe LRU cache for hostname → address mappings
//!
//! # Architecture
//!
//! ```text
//! callers (any thread) ──► DnsCache ──Mutex──► LruCache<String, String>
//!                                               ├─ HashMap<name, slot>
//!                                               └─ Vec<slot> + intrusive recency list
//! ```
//!
//! # Modules
//!
//! - `lru_cache`: single-threaded arena LRU with slot-reusing eviction
//! - `dns_cache`: the thread-safe cache (`update`, `resolve`, `size`, `capacity`)
//! - `global`: optional process-wide instance with first-call-wins capacity
//! - `config`: TOML configuration (capacity, logging)
//! - `logging`: `tracing` subscriber setup
//! - `error`: error types
//!
//! # Quick start
//!
//! ```no_run
//! let config = dnscache::CacheConfig::load(std::path::Path::new("dnscache.toml"))?;
//! let cache = dnscache::init(&config)?;
//! cache.update("example.com", "93.184.216.34");
//! assert_eq!(cache.resolve("example.com").as_deref(), Some("93.184.216.34"));
//! # Ok::<(), dnscache::Error>(())
//! ```
//!
//! # Safety
//!
//! This crate forbids unsafe code.

#![forbid(unsafe_code)]

pub mod config;
pub mod dns_cache;
pub mod error;
pub mod global;
pub mod logging;
pub mod lru_cache;

pub use config::CacheConfig;
pub use dns_cache::DnsCache;
pub use error::{ConfigError, Error, Result};
pub use lru_cache::{CacheStats, LruCache};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a cache from `config`, installing its `[logging]` setup first.
///
/// A global subscriber that is already in place, from an earlier call or from
/// the application, is kept and the logging section is ignored. Invalid
/// fields and an unusable log file are errors; nothing is installed then.
pub fn init(config: &CacheConfig) -> Result<DnsCache> {
    dns_cache::check_config(config)?;
    match logging::init_logging(&config.logging) {
        Ok(()) => {}
        Err(logging::LogError::AlreadyInitialized | logging::LogError::Install(_)) => {
            tracing::debug!("Keeping the existing global subscriber");
        }
        Err(err) => return Err(err.into()),
    }
    DnsCache::from_config(config)
}
