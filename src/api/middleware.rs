//! API middleware.
//!
//! `identify_subject` tags every request with the caller's [`Subject`];
//! `cache_response` serves GET routes from the response cache. Attach the
//! cache with `from_fn_with_state(CacheLayer::new(..), cache_response)` and
//! keep `identify_subject` outside it so the subject is known when the key
//! is derived.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{
    is_successful_payload, CacheKey, SharedCache, ANONYMOUS_SUBJECT, DEFAULT_PREFIX, DEFAULT_TTL,
};
use crate::error::{ApiError, Result};

/// Header carrying the caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header reporting `HIT` or `MISS` on cached routes
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

// == Subject ==
/// Identity a request is scoped to, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(String);

impl Subject {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn anonymous() -> Self {
        Self(ANONYMOUS_SUBJECT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_SUBJECT
    }

    /// Returns the user id, rejecting anonymous callers.
    pub fn require_user(&self) -> Result<&str> {
        if self.is_anonymous() {
            Err(ApiError::Unauthorized(format!(
                "{} header required",
                USER_ID_HEADER
            )))
        } else {
            Ok(&self.0)
        }
    }
}

/// Middleware that reads `x-user-id` into a [`Subject`] extension.
///
/// A missing or blank header yields the anonymous subject.
pub async fn identify_subject(mut request: Request, next: Next) -> Response {
    let subject = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(Subject::new)
        .unwrap_or_else(Subject::anonymous);

    request.extensions_mut().insert(subject);
    next.run(request).await
}

// == Cache Options ==
/// Custom key derivation. An `Err` bypasses the cache for that request.
pub type KeyGenerator = Arc<dyn Fn(&Request) -> Result<String> + Send + Sync>;

/// Predicate that, when true, bypasses the cache for that request.
pub type SkipPredicate = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

/// Per-route cache configuration.
#[derive(Clone)]
pub struct CacheOptions {
    pub ttl: Duration,
    pub prefix: String,
    key_generator: Option<KeyGenerator>,
    skip_cache: Option<SkipPredicate>,
}

impl CacheOptions {
    /// Defaults: 5 minute TTL, `api` prefix.
    pub fn new() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            prefix: DEFAULT_PREFIX.to_string(),
            key_generator: None,
            skip_cache: None,
        }
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn key_generator<F>(mut self, generate: F) -> Self
    where
        F: Fn(&Request) -> Result<String> + Send + Sync + 'static,
    {
        self.key_generator = Some(Arc::new(generate));
        self
    }

    pub fn skip_cache<F>(mut self, skip: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.skip_cache = Some(Arc::new(skip));
        self
    }

    /// Derives the cache key for `request`.
    pub fn derive_key(&self, request: &Request) -> Result<String> {
        if let Some(generate) = &self.key_generator {
            return generate(request);
        }

        let subject = request.extensions().get::<Subject>().map(Subject::as_str);
        CacheKey::from_uri(&self.prefix, subject, request.uri()).map(|key| key.to_string())
    }

    fn should_skip(&self, request: &Request) -> bool {
        self.skip_cache.as_ref().is_some_and(|skip| skip(request))
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CacheOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheOptions")
            .field("ttl", &self.ttl)
            .field("prefix", &self.prefix)
            .field("key_generator", &self.key_generator.is_some())
            .field("skip_cache", &self.skip_cache.is_some())
            .finish()
    }
}

// == Cache Layer ==
/// State handed to [`cache_response`]: the shared store plus route options.
#[derive(Clone, Debug)]
pub struct CacheLayer {
    cache: SharedCache,
    options: Arc<CacheOptions>,
}

impl CacheLayer {
    pub fn new(cache: SharedCache, options: CacheOptions) -> Self {
        Self {
            cache,
            options: Arc::new(options),
        }
    }
}

/// Middleware that serves GET requests from the cache.
///
/// On a hit the wrapped handler is not invoked. On a miss the handler runs
/// and its response is stored only when the status is 200 and the body is
/// JSON not flagged `"success": false`. Other methods, skipped requests and
/// requests whose key cannot be derived pass straight through.
pub async fn cache_response(
    State(layer): State<CacheLayer>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET || layer.options.should_skip(&request) {
        return next.run(request).await;
    }

    let key = match layer.options.derive_key(&request) {
        Ok(key) => key,
        Err(e) => {
            warn!("Cache bypassed for {}: {}", request.uri(), e);
            return next.run(request).await;
        }
    };

    let cached = layer.cache.write().await.get(&key);
    if let Some(value) = cached {
        debug!("Cache HIT: {}", key);
        return (StatusCode::OK, [(X_CACHE, "HIT")], Json(value)).into_response();
    }

    let response = next.run(request).await;
    store_if_successful(&layer, key, response).await
}

async fn store_if_successful(layer: &CacheLayer, key: String, response: Response) -> Response {
    let (mut parts, body) = response.into_parts();
    parts
        .headers
        .insert(X_CACHE, HeaderValue::from_static("MISS"));

    if parts.status != StatusCode::OK {
        debug!("Cache MISS: {} (status {} not cached)", key, parts.status);
        return Response::from_parts(parts, body);
    }

    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to buffer response for {}: {}", key, e);
            return ApiError::Internal("Failed to read response body".to_string()).into_response();
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) if is_successful_payload(&value) => {
            let ttl = layer.options.ttl;
            layer.cache.write().await.set(key.as_str(), value, ttl);
            debug!("Cache MISS: {} (cached for {}s)", key, ttl.as_secs());
        }
        _ => debug!("Cache MISS: {} (response not cacheable)", key),
    }

    Response::from_parts(parts, Body::from(bytes))
}
