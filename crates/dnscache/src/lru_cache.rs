//! Bounded LRU (Least Recently Used) cache with O(1) operations.
//!
//! Uses a HashMap for key→slot lookup and an arena-based doubly-linked list
//! for recency ordering. get/put/peek are O(1) amortized.
//! No unsafe code — uses Vec<Node> with index-based links instead of raw pointers.
//!
//! The arena is allocated once, up to `capacity` slots. When the cache is full
//! a new key does not free and reallocate a node: the tail slot is relabeled
//! with the new key/value and spliced to the head, so the arena never grows
//! past `capacity` and steady-state eviction performs no node allocation.
//!
//! There is no `remove`: entries leave the cache only through eviction.
//!
//! This type is single-threaded (`&mut self` for every promoting access).
//! [`crate::dns_cache::DnsCache`] wraps it in a mutex for shared use.
//!
//! # Example
//! ```
//! use dnscache::lru_cache::LruCache;
//!
//! let mut cache = LruCache::new(3);
//! cache.put(1, "one");
//! cache.put(2, "two");
//! cache.put(3, "three");
//!
//! assert_eq!(cache.get(&1), Some(&"one"));
//! // 1 is now most-recently used, 2 is least-recently used
//!
//! cache.put(4, "four"); // evicts key=2 (LRU)
//! assert_eq!(cache.get(&2), None);
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sentinel value for null links in the doubly-linked list.
const SENTINEL: usize = usize::MAX;

/// A slot in the arena-based doubly-linked list.
#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

/// Cache hit/miss/eviction statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub insertions: u64,
    pub updates: u64,
}

impl CacheStats {
    /// Hit rate as a fraction [0.0, 1.0]. Returns 0.0 if no lookups.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total number of get() calls (hits + misses).
    pub fn total_lookups(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Bounded LRU cache with O(1) operations.
///
/// Internally stores entries in a `Vec<Node>` arena with index-based
/// doubly-linked list links. A `HashMap<K, usize>` maps keys to arena indices.
/// The linked list maintains recency order: head = most recent, tail = least recent.
pub struct LruCache<K, V> {
    /// Maximum number of entries.
    capacity: usize,
    /// Key → arena index mapping.
    map: HashMap<K, usize>,
    /// Arena of slots. Never longer than `capacity`.
    arena: Vec<Node<K, V>>,
    /// Index of most-recently used node (head of list).
    head: usize,
    /// Index of least-recently used node (tail of list).
    tail: usize,
    /// Cache statistics.
    stats: CacheStats,
}

impl<K, V> std::fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys and values are omitted.
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Create a new LRU cache with the given maximum capacity.
    ///
    /// # Panics
    /// Panics if `capacity` is 0. Use [`LruCache::try_new`] to get an error instead.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "LruCache capacity must be > 0");
        Self::with_valid_capacity(capacity)
    }

    /// Create a new LRU cache, rejecting a zero capacity with
    /// [`Error::InvalidConfiguration`].
    pub fn try_new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::zero_capacity());
        }
        Ok(Self::with_valid_capacity(capacity))
    }

    fn with_valid_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            arena: Vec::with_capacity(capacity),
            head: SENTINEL,
            tail: SENTINEL,
            stats: CacheStats::default(),
        }
    }

    /// Returns the maximum capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entries currently stored.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns true if inserting a new key would evict the LRU entry.
    pub fn is_full(&self) -> bool {
        self.map.len() >= self.capacity
    }

    /// Returns a reference to the cache statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Resets the statistics counters.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    /// Get a reference to the value for `key`, promoting it to most-recently used.
    /// Returns `None` if the key is not present.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(&idx) = self.map.get(key) {
            self.move_to_head(idx);
            self.stats.hits += 1;
            Some(&self.arena[idx].value)
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Peek at the value for `key` without promoting it (no recency change).
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).map(|&idx| &self.arena[idx].value)
    }

    /// Returns true if the cache contains the given key (without promoting it).
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Insert or update a key-value pair.
    ///
    /// - Existing key: the value is overwritten in its slot and the slot is
    ///   promoted to most-recently used. The index is left untouched.
    ///   Returns `None`.
    /// - New key with room left: a slot is appended to the arena and linked
    ///   at the head. Returns `None`.
    /// - New key in a full cache: the tail slot is relabeled with the new
    ///   key/value and moved to the head. Returns the displaced
    ///   `Some((evicted_key, evicted_value))`.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.map.get(&key) {
            self.arena[idx].value = value;
            self.move_to_head(idx);
            self.stats.updates += 1;
            return None;
        }

        self.stats.insertions += 1;

        if self.map.len() < self.capacity {
            let idx = self.arena.len();
            self.arena.push(Node {
                key: key.clone(),
                value,
                prev: SENTINEL,
                next: SENTINEL,
            });
            self.push_head(idx);
            self.map.insert(key, idx);
            return None;
        }

        // Full: reuse the LRU slot. capacity >= 1 so the tail exists.
        let idx = self.tail;
        debug_assert_ne!(idx, SENTINEL, "full cache must have a tail");
        self.move_to_head(idx);

        let node = &mut self.arena[idx];
        let evicted_key = std::mem::replace(&mut node.key, key.clone());
        let evicted_value = std::mem::replace(&mut node.value, value);

        self.map.remove(&evicted_key);
        self.map.insert(key, idx);
        self.stats.evictions += 1;

        Some((evicted_key, evicted_value))
    }

    /// Peek at the least-recently used entry without promoting it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        if self.tail == SENTINEL {
            None
        } else {
            let node = &self.arena[self.tail];
            Some((&node.key, &node.value))
        }
    }

    /// Peek at the most-recently used entry without promoting it.
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        if self.head == SENTINEL {
            None
        } else {
            let node = &self.arena[self.head];
            Some((&node.key, &node.value))
        }
    }

    /// Iterate over entries from most-recently used to least-recently used.
    pub fn iter_mru(&self) -> MruIter<'_, K, V> {
        MruIter {
            arena: &self.arena,
            current: self.head,
            remaining: self.map.len(),
        }
    }

    /// Iterate over entries from least-recently used to most-recently used.
    pub fn iter_lru(&self) -> LruIter<'_, K, V> {
        LruIter {
            arena: &self.arena,
            current: self.tail,
            remaining: self.map.len(),
        }
    }

    /// Walk the list and index and report the first structural violation.
    ///
    /// O(n). Intended for tests and diagnostics, not hot paths.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        if self.map.len() > self.capacity {
            return Err(format!(
                "len {} exceeds capacity {}",
                self.map.len(),
                self.capacity
            ));
        }
        if self.arena.len() != self.map.len() {
            return Err(format!(
                "arena holds {} slots but index holds {} keys",
                self.arena.len(),
                self.map.len()
            ));
        }

        let mut prev = SENTINEL;
        let mut current = self.head;
        let mut walked = 0usize;
        while current != SENTINEL {
            if walked >= self.arena.len() {
                return Err("cycle in recency list".to_string());
            }
            let node = &self.arena[current];
            if node.prev != prev {
                return Err(format!("slot {current} has a stale prev link"));
            }
            match self.map.get(&node.key) {
                Some(&idx) if idx == current => {}
                _ => return Err(format!("slot {current} is not indexed under its key")),
            }
            prev = current;
            current = node.next;
            walked += 1;
        }

        if prev != self.tail {
            return Err("tail does not terminate the recency list".to_string());
        }
        if walked != self.map.len() {
            return Err(format!(
                "recency list has {walked} entries but index holds {}",
                self.map.len()
            ));
        }
        Ok(())
    }

    // --- Internal linked-list operations ---

    /// Remove node at `idx` from the doubly-linked list (the slot stays allocated).
    fn unlink(&mut self, idx: usize) {
        let prev = self.arena[idx].prev;
        let next = self.arena[idx].next;

        if prev != SENTINEL {
            self.arena[prev].next = next;
        } else {
            self.head = next;
        }

        if next != SENTINEL {
            self.arena[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.arena[idx].prev = SENTINEL;
        self.arena[idx].next = SENTINEL;
    }

    /// Push node at `idx` to the head of the list (most-recently used).
    fn push_head(&mut self, idx: usize) {
        self.arena[idx].prev = SENTINEL;
        self.arena[idx].next = self.head;

        if self.head != SENTINEL {
            self.arena[self.head].prev = idx;
        }
        self.head = idx;

        if self.tail == SENTINEL {
            self.tail = idx;
        }
    }

    /// Move an existing node to the head (most-recently used).
    fn move_to_head(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.push_head(idx);
    }
}

/// Iterator from most-recently used to least-recently used.
pub struct MruIter<'a, K, V> {
    arena: &'a [Node<K, V>],
    current: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for MruIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == SENTINEL || self.remaining == 0 {
            return None;
        }
        let node = &self.arena[self.current];
        self.current = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for MruIter<'_, K, V> {}

/// Iterator from least-recently used to most-recently used.
pub struct LruIter<'a, K, V> {
    arena: &'a [Node<K, V>],
    current: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for LruIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == SENTINEL || self.remaining == 0 {
            return None;
        }
        let node = &self.arena[self.current];
        self.current = node.prev;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for LruIter<'_, K, V> {}
