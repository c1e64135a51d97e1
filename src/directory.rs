//! User Directory
//!
//! In-memory profiles and rewards behind the cached read routes. Every
//! mutating method here has a matching cache invalidation in the handlers.

use std::collections::HashMap;

use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::{
    AwardRewardRequest, PointsAward, Reward, UpdatePreferencesRequest, UpdateProfileRequest,
    UserProfile,
};

#[derive(Debug, Default)]
pub struct UserDirectory {
    profiles: HashMap<String, UserProfile>,
    rewards: HashMap<String, Vec<Reward>>,
    next_reward_id: u64,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self, user_id: &str) -> Option<&UserProfile> {
        self.profiles.get(user_id)
    }

    fn profile_mut(&mut self, user_id: &str) -> Result<&mut UserProfile> {
        self.profiles
            .get_mut(user_id)
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Applies a profile update, creating the profile on first write.
    pub fn upsert_profile(&mut self, user_id: &str, update: &UpdateProfileRequest) -> UserProfile {
        let profile = self
            .profiles
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile::new(user_id));

        if let Some(nickname) = &update.nickname {
            profile.nickname = nickname.trim().to_string();
        }
        if let Some(language) = &update.language {
            profile.language = language.clone();
        }
        if let Some(currency) = &update.currency {
            profile.currency = currency.clone();
        }
        profile.updated_at = Utc::now();
        profile.clone()
    }

    pub fn update_preferences(
        &mut self,
        user_id: &str,
        update: &UpdatePreferencesRequest,
    ) -> Result<UserProfile> {
        let profile = self.profile_mut(user_id)?;

        if let Some(personality) = &update.ai_personality {
            profile.ai_personality = Some(personality.clone());
        }
        if let Some(anonymous_mode) = update.anonymous_mode {
            profile.anonymous_mode = anonymous_mode;
        }
        if let Some(store_chat) = update.store_chat {
            profile.store_chat = store_chat;
        }
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    /// Adds points, moving up one level once the total reaches `level * 100`.
    pub fn award_points(&mut self, user_id: &str, points: u64) -> Result<PointsAward> {
        let profile = self.profile_mut(user_id)?;
        let previous_level = profile.level;

        profile.points = profile.points.saturating_add(points);
        if profile.points >= profile.next_level_points() {
            profile.level += 1;
        }
        profile.updated_at = Utc::now();

        Ok(PointsAward {
            points: profile.points,
            level: profile.level,
            leveled_up: profile.level > previous_level,
        })
    }

    /// Rewards for a user, newest first.
    pub fn rewards(&self, user_id: &str) -> Vec<Reward> {
        self.rewards
            .get(user_id)
            .map(|rewards| rewards.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    pub fn award_reward(&mut self, user_id: &str, request: &AwardRewardRequest) -> Result<Reward> {
        if !self.profiles.contains_key(user_id) {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        self.next_reward_id += 1;
        let reward = Reward {
            id: self.next_reward_id,
            user_id: user_id.to_string(),
            reward_type: request.reward_type.trim().to_string(),
            title: request.title.trim().to_string(),
            description: request.description.clone().unwrap_or_default(),
            awarded_at: Utc::now(),
        };

        self.rewards
            .entry(user_id.to_string())
            .or_default()
            .push(reward.clone());
        Ok(reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn award(title: &str) -> AwardRewardRequest {
        AwardRewardRequest {
            reward_type: "badge".to_string(),
            title: title.to_string(),
            description: None,
        }
    }

    fn directory_with(user_id: &str) -> UserDirectory {
        let mut directory = UserDirectory::new();
        directory.upsert_profile(user_id, &UpdateProfileRequest::default());
        directory
    }

    #[test]
    fn test_upsert_creates_then_updates() {
        let mut directory = UserDirectory::new();
        assert!(directory.profile("42").is_none());

        let created = directory.upsert_profile("42", &UpdateProfileRequest::default());
        assert_eq!(created.nickname, "42");

        let updated = directory.upsert_profile(
            "42",
            &UpdateProfileRequest {
                nickname: Some("Amina".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(updated.nickname, "Amina");
        assert_eq!(updated.language, "en");
    }

    #[test]
    fn test_preferences_require_profile() {
        let mut directory = UserDirectory::new();
        let result = directory.update_preferences("1", &UpdatePreferencesRequest::default());
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_award_points_levels_up_once() {
        let mut directory = directory_with("1");

        let award = directory.award_points("1", 60).unwrap();
        assert_eq!((award.points, award.level, award.leveled_up), (60, 1, false));

        let award = directory.award_points("1", 50).unwrap();
        assert_eq!((award.points, award.level, award.leveled_up), (110, 2, true));

        let award = directory.award_points("1", 500).unwrap();
        assert_eq!(award.level, 3);
    }

    #[test]
    fn test_rewards_newest_first() {
        let mut directory = directory_with("1");
        directory.award_reward("1", &award("first")).unwrap();
        directory.award_reward("1", &award("second")).unwrap();

        let titles: Vec<_> = directory.rewards("1").into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[test]
    fn test_award_reward_unknown_user() {
        let mut directory = UserDirectory::new();
        assert!(matches!(
            directory.award_reward("ghost", &award("x")),
            Err(ApiError::NotFound(_))
        ));
        assert!(directory.rewards("ghost").is_empty());
    }
}
