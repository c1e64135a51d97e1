//! Domain records served by the profile and rewards routes.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A user's profile and progression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub nickname: String,
    pub language: String,
    pub currency: String,
    pub ai_personality: Option<String>,
    pub anonymous_mode: bool,
    pub store_chat: bool,
    pub points: u64,
    pub level: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let now = Utc::now();
        Self {
            nickname: id.clone(),
            id,
            language: "en".to_string(),
            currency: "USD".to_string(),
            ai_personality: None,
            anonymous_mode: false,
            store_chat: true,
            points: 0,
            level: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Points needed to leave the current level.
    pub fn next_level_points(&self) -> u64 {
        u64::from(self.level) * 100
    }
}

/// A reward granted to a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reward {
    pub id: u64,
    pub user_id: String,
    #[serde(rename = "type")]
    pub reward_type: String,
    pub title: String,
    pub description: String,
    pub awarded_at: DateTime<Utc>,
}

/// Outcome of adding points to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointsAward {
    pub points: u64,
    pub level: u32,
    pub leveled_up: bool,
}
