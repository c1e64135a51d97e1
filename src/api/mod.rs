//! API Module
//!
//! HTTP handlers, middleware and routing for the service REST API.
//!
//! # Endpoints
//! - `GET /api/user/profile` - Caller profile (cached)
//! - `GET /api/rewards` - Caller rewards (cached)
//! - Mutations under `/api/user` and `/api/rewards` invalidate the caller's cache
//! - `/api/cache/*` - Cache statistics and administration
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use middleware::{cache_response, identify_subject, CacheLayer, CacheOptions, Subject};
pub use routes::create_router;
