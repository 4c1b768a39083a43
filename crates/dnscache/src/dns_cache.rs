//! Thread-safe hostname → address cache with LRU eviction.
//!
//! [`DnsCache`] wraps an [`LruCache<String, String>`] in a single
//! [`Mutex`]. Every operation, including `resolve`, takes the lock
//! exclusively: a successful lookup promotes the entry, so reads mutate the
//! recency list just like writes do and a reader/writer lock would buy
//! nothing.
//!
//! Because the lock covers each call end to end, operations are
//! linearizable and the eviction path (relabel tail slot, splice to head,
//! swap index keys) is never observable half-done.
//!
//! Share a cache between threads with `Arc<DnsCache>`:
//!
//! ```
//! use std::sync::Arc;
//! use dnscache::DnsCache;
//!
//! let cache = Arc::new(DnsCache::new(128)?);
//! let worker = {
//!     let cache = Arc::clone(&cache);
//!     std::thread::spawn(move || cache.update("example.com", "93.184.216.34"))
//! };
//! worker.join().unwrap();
//! assert_eq!(cache.resolve("example.com").as_deref(), Some("93.184.216.34"));
//! # Ok::<(), dnscache::Error>(())
//! ```

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, trace, warn};

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::lru_cache::{CacheStats, LruCache};

/// Bounded, thread-safe LRU cache from hostnames to resolved addresses.
#[derive(Debug)]
pub struct DnsCache {
    inner: Mutex<LruCache<String, String>>,
    /// Copy of the inner capacity so `capacity()` doesn't need the lock.
    capacity: usize,
}

impl DnsCache {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// Fails with [`crate::Error::InvalidConfiguration`] when `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        let cache = LruCache::try_new(capacity)?;
        info!(capacity, "DNS cache created");
        Ok(Self {
            inner: Mutex::new(cache),
            capacity,
        })
    }

    /// Create a cache from a validated [`CacheConfig`].
    ///
    /// A zero capacity fails with [`crate::Error::InvalidConfiguration`], the
    /// same as [`DnsCache::new`]; other invalid fields fail with
    /// [`crate::Error::Config`].
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        check_config(config)?;
        Self::new(config.capacity)
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, String>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            // LruCache never panics between link updates, so the state a
            // panicking holder left behind is still consistent.
            warn!("DNS cache lock was poisoned; recovering");
            poisoned.into_inner()
        })
    }

    /// Store `address` for `name` and make it the most recently used entry.
    ///
    /// An existing entry is overwritten in place. A new entry in a full cache
    /// evicts exactly one entry, the least recently used.
    pub fn update(&self, name: impl Into<String>, address: impl Into<String>) {
        let name = name.into();
        let address = address.into();
        trace!(name = %name, "Updating entry");

        let mut cache = self.lock();
        if let Some((evicted, _)) = cache.put(name, address) {
            debug!(
                evicted = %evicted,
                size = cache.len(),
                capacity = self.capacity,
                "Evicted least recently used entry"
            );
        }
    }

    /// Look up the address for `name`.
    ///
    /// A hit promotes the entry to most recently used. A miss returns `None`
    /// and leaves the cache unchanged.
    pub fn resolve(&self, name: &str) -> Option<String> {
        let mut cache = self.lock();
        let found = cache.get(name).cloned();
        trace!(name, hit = found.is_some(), "Resolve");
        found
    }

    /// Current number of entries, always in `[0, capacity]`.
    pub fn size(&self) -> usize {
        self.lock().len()
    }

    /// The fixed maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether `name` is cached. Does not count as a use.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Snapshot of hit/miss/insertion/update/eviction counters.
    pub fn stats(&self) -> CacheStats {
        *self.lock().stats()
    }

    /// Entries from most to least recently used, read under one lock
    /// acquisition. Does not count as a use.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.lock()
            .iter_mru()
            .map(|(name, address)| (name.clone(), address.clone()))
            .collect()
    }
}

/// Capacity first, so a zero capacity reports the same kind everywhere.
pub(crate) fn check_config(config: &CacheConfig) -> Result<()> {
    if config.capacity == 0 {
        return Err(Error::zero_capacity());
    }
    config.validate()?;
    Ok(())
}
