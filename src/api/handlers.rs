//! API Handlers
//!
//! HTTP request handlers for the profile, rewards and cache admin endpoints.
//! Every handler that mutates user data invalidates that user's cached reads
//! after the write completes.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::api::middleware::Subject;
use crate::cache::{
    get_or_fetch, invalidate_resource, invalidate_subject, shared, CacheKey, CacheStore,
    SharedCache, DEFAULT_TTL,
};
use crate::config::Config;
use crate::directory::UserDirectory;
use crate::error::{ApiError, Result};
use crate::models::{
    AwardPointsRequest, AwardPointsResponse, AwardRewardRequest, AwardRewardResponse,
    CacheStatsResponse, HealthResponse, PointsResponse, ProfileResponse, RemovedResponse,
    RewardsResponse, UpdatePreferencesRequest, UpdateProfileRequest, UpdateProfileResponse,
};
use crate::tasks::sweep_now;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide response cache
    pub cache: SharedCache,
    /// User profiles and rewards
    pub directory: Arc<RwLock<UserDirectory>>,
    /// TTL for cached read routes
    pub cache_ttl: Duration,
    /// When false, read routes are mounted without the cache layer
    pub cache_enabled: bool,
}

impl AppState {
    /// Creates a new AppState around the given cache store.
    pub fn new(cache: CacheStore) -> Self {
        Self {
            cache: shared(cache),
            directory: Arc::new(RwLock::new(UserDirectory::new())),
            cache_ttl: DEFAULT_TTL,
            cache_enabled: true,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            cache_ttl: config.ttl(),
            cache_enabled: config.cache_enabled,
            ..Self::new(CacheStore::new())
        }
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

// == Profile ==

/// Handler for GET /api/user/profile (cached, prefix `user`)
pub async fn get_profile_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
) -> Result<Json<ProfileResponse>> {
    let user_id = subject.require_user()?;

    let directory = state.directory.read().await;
    let profile = directory
        .profile(user_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse::new(profile)))
}

/// Handler for PUT /api/user/profile
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>> {
    let user_id = subject.require_user()?;
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let profile = state.directory.write().await.upsert_profile(user_id, &req);
    invalidate_subject(&state.cache, user_id).await;

    Ok(Json(UpdateProfileResponse::new("Profile updated", profile)))
}

/// Handler for PUT /api/user/preferences
pub async fn update_preferences_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Json(req): Json<UpdatePreferencesRequest>,
) -> Result<Json<UpdateProfileResponse>> {
    let user_id = subject.require_user()?;

    let profile = state
        .directory
        .write()
        .await
        .update_preferences(user_id, &req)?;
    invalidate_subject(&state.cache, user_id).await;

    Ok(Json(UpdateProfileResponse::new("Preferences updated", profile)))
}

// == Points ==

/// Handler for GET /api/user/points
///
/// Cached through [`get_or_fetch`] rather than the route layer.
pub async fn get_points_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
) -> Result<Json<Value>> {
    let user_id = subject.require_user()?;

    let fetch = || async {
        let directory = state.directory.read().await;
        let profile = directory
            .profile(user_id)
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        serde_json::to_value(PointsResponse::from_profile(profile))
            .map_err(|e| ApiError::Internal(e.to_string()))
    };

    if !state.cache_enabled {
        return fetch().await.map(Json);
    }

    let key = CacheKey::new("points", Some(user_id), "/points", &[])?.to_string();
    let value = get_or_fetch(&state.cache, &key, state.cache_ttl, fetch).await?;
    Ok(Json(value))
}

/// Handler for POST /api/user/points
pub async fn award_points_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Json(req): Json<AwardPointsRequest>,
) -> Result<Json<AwardPointsResponse>> {
    let user_id = subject.require_user()?;

    let award = state
        .directory
        .write()
        .await
        .award_points(user_id, req.points)?;
    invalidate_subject(&state.cache, user_id).await;

    if award.leveled_up {
        tracing::info!("User {} reached level {}", user_id, award.level);
    }
    Ok(Json(AwardPointsResponse::new(award)))
}

// == Rewards ==

/// Handler for GET /api/rewards (cached, prefix `rewards`)
pub async fn get_rewards_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
) -> Result<Json<RewardsResponse>> {
    let user_id = subject.require_user()?;
    let rewards = state.directory.read().await.rewards(user_id);

    Ok(Json(RewardsResponse::new(rewards)))
}

/// Handler for POST /api/rewards/award
pub async fn award_reward_handler(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Json(req): Json<AwardRewardRequest>,
) -> Result<Json<AwardRewardResponse>> {
    let user_id = subject.require_user()?;
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let reward = state.directory.write().await.award_reward(user_id, &req)?;
    invalidate_subject(&state.cache, user_id).await;

    Ok(Json(AwardRewardResponse::new(reward.id)))
}

// == Cache Administration ==

/// Handler for GET /api/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(CacheStatsResponse::new(stats))
}

/// Handler for POST /api/cache/sweep
pub async fn sweep_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    Json(RemovedResponse::new(sweep_now(&state.cache).await))
}

/// Handler for DELETE /api/cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.cache.write().await.clear_all();
    tracing::info!("Cleared {} cached entries", removed);
    Json(RemovedResponse::new(removed))
}

/// Handler for DELETE /api/cache/subject/:id
pub async fn invalidate_subject_handler(
    State(state): State<AppState>,
    Path(subject): Path<String>,
) -> Json<RemovedResponse> {
    Json(RemovedResponse::new(
        invalidate_subject(&state.cache, &subject).await,
    ))
}

/// Handler for DELETE /api/cache/resource/:prefix
pub async fn invalidate_resource_handler(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> Json<RemovedResponse> {
    Json(RemovedResponse::new(
        invalidate_resource(&state.cache, &prefix).await,
    ))
}
