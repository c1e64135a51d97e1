//! Cache Module
//!
//! Provides the in-memory response cache with TTL expiry, canonical key
//! derivation and per-subject invalidation.

mod clock;
mod entry;
mod invalidate;
pub mod key;
mod stats;
mod store;
mod wrap;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

// Re-export public types
pub use clock::{Clock, MockClock, SystemClock};
pub use entry::CacheEntry;
pub use invalidate::{invalidate_resource, invalidate_subject};
pub use key::{CacheKey, ANONYMOUS_SUBJECT};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use wrap::{get_or_fetch, is_successful_payload};

// == Public Constants ==
/// TTL applied when a cached route does not specify one
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Key prefix applied when a cached route does not specify one
pub const DEFAULT_PREFIX: &str = "api";

/// Interval between background expiry sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

// == Shared Handle ==
/// Process-wide cache handle shared by routes, mutation handlers and the
/// sweep task.
pub type SharedCache = Arc<RwLock<CacheStore>>;

/// Wraps a store into a [`SharedCache`] handle.
pub fn shared(store: CacheStore) -> SharedCache {
    Arc::new(RwLock::new(store))
}
