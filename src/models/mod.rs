//! Request, response and record models for the service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod records;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use records::{PointsAward, Reward, UserProfile};
pub use requests::{
    AwardPointsRequest, AwardRewardRequest, UpdatePreferencesRequest, UpdateProfileRequest,
};
pub use responses::{
    AwardPointsResponse, AwardRewardResponse, CacheStatsResponse, HealthResponse,
    PointsResponse, ProfileResponse, RemovedResponse, RewardsResponse, UpdateProfileResponse,
};
