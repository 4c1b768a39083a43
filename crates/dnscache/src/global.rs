//! Optional process-wide cache instance.
//!
//! Prefer passing an `Arc<DnsCache>` to the code that needs it. This module
//! exists for callers that want a single shared cache without threading a
//! handle through, and keeps first-call-wins semantics: the capacity given to
//! the first successful [`init_global`] fixes the cache for the lifetime of the
//! process, and later capacity arguments are ignored.

use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use crate::dns_cache::DnsCache;
use crate::error::Result;

static GLOBAL_DNS_CACHE: OnceLock<Arc<DnsCache>> = OnceLock::new();

/// Get the global cache, creating it with `capacity` on first use.
///
/// Once the cache exists, `capacity` is ignored and the existing handle is
/// returned. A zero capacity on the first call fails with
/// [`crate::Error::InvalidConfiguration`] and leaves the global unset, so a
/// later call with a valid capacity can still initialize it.
pub fn init_global(capacity: usize) -> Result<Arc<DnsCache>> {
    if let Some(existing) = GLOBAL_DNS_CACHE.get() {
        note_ignored_capacity(existing, capacity);
        return Ok(Arc::clone(existing));
    }

    let candidate = DnsCache::new(capacity)?;
    let mut installed = false;
    let cache = GLOBAL_DNS_CACHE.get_or_init(|| {
        installed = true;
        Arc::new(candidate)
    });

    if installed {
        info!(capacity, "Global DNS cache initialized");
    } else {
        // Another thread won the race between `get` and `get_or_init`.
        note_ignored_capacity(cache, capacity);
    }
    Ok(Arc::clone(cache))
}

/// Get the global cache if it has been initialized.
pub fn global() -> Option<Arc<DnsCache>> {
    GLOBAL_DNS_CACHE.get().cloned()
}

fn note_ignored_capacity(existing: &DnsCache, requested: usize) {
    if existing.capacity() != requested {
        debug!(
            capacity = existing.capacity(),
            requested, "Global DNS cache already initialized; ignoring requested capacity"
        );
    }
}
