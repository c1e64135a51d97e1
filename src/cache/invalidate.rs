//! Invalidation Helpers
//!
//! Mutating handlers call these after their write completes so that cached
//! reads for the affected subject or resource are recomputed.

use tracing::{debug, info};

use crate::cache::SharedCache;

/// Drops every cached entry scoped to `subject`.
///
/// Must be called by every mutation whose effect is visible through a cached
/// read for that subject. Returns the number of entries removed.
pub async fn invalidate_subject(cache: &SharedCache, subject: &str) -> usize {
    let removed = cache.write().await.clear_for_subject(subject);

    if removed > 0 {
        info!("Invalidated {} cached entries for subject {}", removed, subject);
    } else {
        debug!("No cached entries to invalidate for subject {}", subject);
    }
    removed
}

/// Drops every cached entry under `prefix`, across all subjects.
pub async fn invalidate_resource(cache: &SharedCache, prefix: &str) -> usize {
    let removed = cache.write().await.clear_for_prefix(prefix);
    info!("Invalidated {} cached entries for resource {}", removed, prefix);
    removed
}
