//! Response DTOs for the service API
//!
//! Defines the structure of outgoing HTTP response bodies. Every body carries
//! `success`, which the cache layer reads to decide whether to store it.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::{PointsAward, Reward, UserProfile};

/// Response body for `GET /api/user/profile`
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserProfile,
}

impl ProfileResponse {
    pub fn new(user: UserProfile) -> Self {
        Self {
            success: true,
            user,
        }
    }
}

/// Response body for profile and preference updates
#[derive(Debug, Clone, Serialize)]
pub struct UpdateProfileResponse {
    pub success: bool,
    pub message: String,
    pub user: UserProfile,
}

impl UpdateProfileResponse {
    pub fn new(message: impl Into<String>, user: UserProfile) -> Self {
        Self {
            success: true,
            message: message.into(),
            user,
        }
    }
}

/// Response body for `GET /api/user/points`
#[derive(Debug, Clone, Serialize)]
pub struct PointsResponse {
    pub success: bool,
    pub points: u64,
    pub level: u32,
    pub next_level_points: u64,
}

impl PointsResponse {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            success: true,
            points: profile.points,
            level: profile.level,
            next_level_points: profile.next_level_points(),
        }
    }
}

/// Response body for `POST /api/user/points`
#[derive(Debug, Clone, Serialize)]
pub struct AwardPointsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub award: PointsAward,
}

impl AwardPointsResponse {
    pub fn new(award: PointsAward) -> Self {
        Self {
            success: true,
            award,
        }
    }
}

/// Response body for `GET /api/rewards`
#[derive(Debug, Clone, Serialize)]
pub struct RewardsResponse {
    pub success: bool,
    pub rewards: Vec<Reward>,
}

impl RewardsResponse {
    pub fn new(rewards: Vec<Reward>) -> Self {
        Self {
            success: true,
            rewards,
        }
    }
}

/// Response body for `POST /api/rewards/award`
#[derive(Debug, Clone, Serialize)]
pub struct AwardRewardResponse {
    pub success: bool,
    pub reward_id: u64,
}

impl AwardRewardResponse {
    pub fn new(reward_id: u64) -> Self {
        Self {
            success: true,
            reward_id,
        }
    }
}

/// Response body for `GET /api/cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl CacheStatsResponse {
    pub fn new(stats: CacheStats) -> Self {
        Self {
            success: true,
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for cache administration (sweep, clear, invalidate)
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    pub success: bool,
    /// Number of cache entries removed
    pub removed: usize,
}

impl RemovedResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            success: true,
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
