//! Read Wrapper
//!
//! Caches the result of an arbitrary async read without the read knowing
//! about the cache. The HTTP middleware applies the same rules to responses.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::SharedCache;

/// Returns false for payloads that flag themselves unsuccessful
/// (an object with `"success": false`).
pub fn is_successful_payload(value: &Value) -> bool {
    value.get("success") != Some(&Value::Bool(false))
}

/// Returns the cached value for `key`, or runs `fetch` and caches its result.
///
/// `fetch` is only invoked on a miss. Its result is stored for `ttl` only when
/// it is `Ok` and the payload is not flagged unsuccessful. Errors are returned
/// unchanged and never cached.
pub async fn get_or_fetch<F, Fut, E>(
    cache: &SharedCache,
    key: &str,
    ttl: Duration,
    fetch: F,
) -> Result<Value, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value, E>>,
{
    let cached = cache.write().await.get(key);
    if let Some(value) = cached {
        debug!("Cache HIT: {}", key);
        return Ok(value);
    }

    let value = fetch().await?;

    if is_successful_payload(&value) {
        cache.write().await.set(key, value.clone(), ttl);
        debug!("Cache MISS: {} (cached for {}s)", key, ttl.as_secs());
    } else {
        debug!("Cache MISS: {} (unsuccessful result not cached)", key);
    }

    Ok(value)
}
