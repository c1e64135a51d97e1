//! Cache Statistics Module
//!
//! Point-in-time entry counts plus running hit/miss/invalidation counters.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of the cache state.
///
/// `total`, `valid` and `expired` are computed against the current time when
/// the snapshot is taken. The remaining fields are running counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of entries physically present
    pub total: usize,
    /// Entries that have not yet expired
    pub valid: usize,
    /// Entries past their expiry but not yet swept or read
    pub expired: usize,
    /// Lookups that returned a value
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries removed by subject or resource invalidation
    pub invalidations: u64,
    /// Entries removed by expiry sweeps
    pub swept: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_invalidations(&mut self, count: usize) {
        self.invalidations += count as u64;
    }

    pub fn record_swept(&mut self, count: usize) {
        self.swept += count as u64;
    }

    // == Entry Counts ==
    /// Fills in the point-in-time entry partition.
    pub fn set_entry_counts(&mut self, valid: usize, expired: usize) {
        self.valid = valid;
        self.expired = expired;
        self.total = valid + expired;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate() {
        let mut stats = CacheStats::new();
        for _ in 0..3 {
            stats.record_hit();
        }
        stats.record_miss();

        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_entry_counts() {
        let mut stats = CacheStats::new();
        stats.set_entry_counts(4, 2);

        assert_eq!(stats.total, 6);
        assert_eq!(stats.valid, 4);
        assert_eq!(stats.expired, 2);
    }

    #[test]
    fn test_removal_counters_accumulate() {
        let mut stats = CacheStats::new();
        stats.record_invalidations(3);
        stats.record_invalidations(2);
        stats.record_swept(4);

        assert_eq!(stats.invalidations, 5);
        assert_eq!(stats.swept, 4);
    }
}
