//! Response Cache - In-process TTL cache for read-heavy REST endpoints
//!
//! Caches JSON responses per user with TTL expiry, periodic sweeping and
//! explicit per-user invalidation.

pub mod api;
pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::SweepTask;
