//! Request DTOs for the service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Maximum accepted length for free-text fields
pub const MAX_TEXT_LENGTH: usize = 256;

/// Request body for `PUT /api/user/profile`
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl UpdateProfileRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(nickname) = &self.nickname {
            if nickname.trim().is_empty() {
                return Some("Nickname cannot be empty".to_string());
            }
            if nickname.len() > MAX_TEXT_LENGTH {
                return Some(format!(
                    "Nickname exceeds maximum length of {} characters",
                    MAX_TEXT_LENGTH
                ));
            }
        }
        None
    }
}

/// Request body for `PUT /api/user/preferences`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePreferencesRequest {
    #[serde(default)]
    pub ai_personality: Option<String>,
    #[serde(default)]
    pub anonymous_mode: Option<bool>,
    #[serde(default)]
    pub store_chat: Option<bool>,
}

/// Request body for `POST /api/rewards/award`
#[derive(Debug, Clone, Deserialize)]
pub struct AwardRewardRequest {
    #[serde(rename = "type", default)]
    pub reward_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl AwardRewardRequest {
    pub fn validate(&self) -> Option<String> {
        if self.reward_type.trim().is_empty() || self.title.trim().is_empty() {
            return Some("Type and title required".to_string());
        }
        if self.title.len() > MAX_TEXT_LENGTH {
            return Some(format!(
                "Title exceeds maximum length of {} characters",
                MAX_TEXT_LENGTH
            ));
        }
        None
    }
}

/// Request body for `POST /api/user/points`
#[derive(Debug, Clone, Deserialize)]
pub struct AwardPointsRequest {
    pub points: u64,
    #[serde(default)]
    pub reason: Option<String>,
}
