//! API Routes
//!
//! Configures the Axum router and attaches the response cache to read routes.

use axum::{
    middleware,
    routing::{delete, get, post, put, MethodRouter},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    award_points_handler, award_reward_handler, cache_stats_handler, clear_cache_handler,
    get_points_handler, get_profile_handler, get_rewards_handler, health_handler,
    invalidate_resource_handler, invalidate_subject_handler, sweep_handler,
    update_preferences_handler, update_profile_handler, AppState,
};
use super::middleware::{cache_response, identify_subject, CacheLayer, CacheOptions};

/// Wraps `route` with the response cache under `prefix`, unless caching is
/// disabled for this state.
fn cached(state: &AppState, prefix: &str, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    if !state.cache_enabled {
        return route;
    }

    let options = CacheOptions::new().ttl(state.cache_ttl).prefix(prefix);
    route.layer(middleware::from_fn_with_state(
        CacheLayer::new(state.cache.clone(), options),
        cache_response,
    ))
}

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET|PUT /api/user/profile` - Read (cached) or update the caller's profile
/// - `PUT /api/user/preferences` - Update the caller's preferences
/// - `GET|POST /api/user/points` - Read (cached) or add to the caller's points
/// - `GET /api/rewards` - List the caller's rewards (cached)
/// - `POST /api/rewards/award` - Award the caller a reward
/// - `GET /api/cache/stats` - Cache statistics
/// - `POST /api/cache/sweep` - Run an expiry sweep now
/// - `DELETE /api/cache` - Clear the whole cache
/// - `DELETE /api/cache/subject/:id` - Invalidate one subject
/// - `DELETE /api/cache/resource/:prefix` - Invalidate one resource type
///
/// # Middleware
/// - Subject: reads `x-user-id` into request extensions
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let user_routes = Router::new()
        .route(
            "/profile",
            cached(&state, "user", get(get_profile_handler)).put(update_profile_handler),
        )
        .route("/preferences", put(update_preferences_handler))
        .route(
            "/points",
            get(get_points_handler).post(award_points_handler),
        );

    let reward_routes = Router::new()
        .route("/", cached(&state, "rewards", get(get_rewards_handler)))
        .route("/award", post(award_reward_handler));

    let cache_routes = Router::new()
        .route("/", delete(clear_cache_handler))
        .route("/stats", get(cache_stats_handler))
        .route("/sweep", post(sweep_handler))
        .route("/subject/:id", delete(invalidate_subject_handler))
        .route("/resource/:prefix", delete(invalidate_resource_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/user", user_routes)
        .nest("/api/rewards", reward_routes)
        .nest("/api/cache", cache_routes)
        .layer(middleware::from_fn(identify_subject))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
