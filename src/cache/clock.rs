//! Clock Module
//!
//! Wall-clock source for entry expiry. The store never calls `SystemTime`
//! directly so tests can move time forward without sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Clock Trait ==
/// Source of the current wall-clock time in Unix milliseconds.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Milliseconds since the Unix epoch.
    fn millis_since_epoch(&self) -> u64;
}

// == System Clock ==
/// Real system clock used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn millis_since_epoch(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

// == Mock Clock ==
/// Manually driven clock for tests.
///
/// Clones share the same underlying time, so a clone handed to a
/// `CacheStore` can be advanced from the test body.
#[derive(Debug, Clone)]
pub struct MockClock {
    now_ms: Arc<AtomicU64>,
}

impl MockClock {
    /// Creates a mock clock starting at the current real time.
    pub fn new() -> Self {
        Self::starting_at(SystemClock.millis_since_epoch())
    }

    /// Creates a mock clock starting at a fixed Unix millisecond timestamp.
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(AtomicU64::new(now_ms)),
        }
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.now_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn millis_since_epoch(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
