//! Cache Store Module
//!
//! TTL-bounded key/value storage for cached JSON responses.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::cache::key::{escape_component, prefix_of, subject_of};
use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};

// == Cache Store ==
/// In-memory response cache with lazy and swept TTL expiry.
///
/// Growth is unbounded; entries that are never read again after expiry are
/// only reclaimed by [`CacheStore::sweep_expired`].
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Running counters
    stats: CacheStats,
    /// Time source for expiry checks
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store that reads time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            clock,
        }
    }

    fn now(&self) -> u64 {
        self.clock.millis_since_epoch()
    }

    // == Get ==
    /// Returns a copy of the value stored under `key`.
    ///
    /// An entry found past its expiry is removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let now = self.now();

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired_at(now) {
                let value = entry.value.clone();
                self.stats.record_hit();
                return Some(value);
            }

            // Lazy eviction
            self.entries.remove(key);
        }

        self.stats.record_miss();
        None
    }

    // == Set ==
    /// Stores `value` under `key` until `ttl` has elapsed.
    ///
    /// Any existing entry for the key is replaced and its TTL reset.
    pub fn set(&mut self, key: impl Into<String>, value: Value, ttl: Duration) {
        let entry = CacheEntry::new(value, self.now(), ttl);
        self.entries.insert(key.into(), entry);
    }

    // == Delete ==
    /// Removes the entry for `key`. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear For Subject ==
    /// Removes every entry whose key subject equals `subject`.
    ///
    /// Returns the number of entries removed.
    pub fn clear_for_subject(&mut self, subject: &str) -> usize {
        let subject = escape_component(subject);
        let removed = self.remove_where(|key| subject_of(key) == Some(subject.as_ref()));
        self.stats.record_invalidations(removed);
        removed
    }

    // == Clear For Prefix ==
    /// Removes every entry whose key prefix equals `prefix`, for all subjects.
    pub fn clear_for_prefix(&mut self, prefix: &str) -> usize {
        let prefix = escape_component(prefix);
        let removed = self.remove_where(|key| prefix_of(key) == Some(prefix.as_ref()));
        self.stats.record_invalidations(removed);
        removed
    }

    // == Clear All ==
    /// Empties the store. Returns the number of entries removed.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    // == Stats ==
    /// Returns current statistics without evicting anything.
    pub fn stats(&self) -> CacheStats {
        let now = self.now();
        let expired = self
            .entries
            .values()
            .filter(|entry| entry.is_expired_at(now))
            .count();

        let mut stats = self.stats.clone();
        stats.set_entry_counts(self.entries.len() - expired, expired);
        stats
    }

    // == Sweep Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.entries.len();
        self.stats.record_swept(removed);
        removed
    }

    // == Length ==
    /// Returns the number of entries physically present, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_where(&mut self, matches: impl Fn(&str) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !matches(key));
        before - self.entries.len()
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}
