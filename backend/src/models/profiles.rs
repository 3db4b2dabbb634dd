use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::empty_string_as_none;

/// Public profile owned by one auth identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub portfolio_url: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a profile other users get to see next to listings, offers and messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PublicProfile {
    pub user_id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
}

impl From<&UserProfile> for PublicProfile {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_id: profile.user_id,
            name: profile.name.clone(),
            avatar_url: profile.avatar_url.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 500, message = "Bio must be under 500 characters"))]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url(message = "Portfolio URL must be a valid URL"))]
    pub portfolio_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url(message = "Avatar URL must be a valid URL"))]
    pub avatar_url: Option<String>,
}

/// Validated profile fields ready for the store
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub portfolio_url: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            bio: req.bio,
            location: req.location,
            portfolio_url: req.portfolio_url,
            avatar_url: req.avatar_url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "skill_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    Offering,
    Needing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "skill_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[serde(alias = "Beginner")]
    Beginner,
    #[serde(alias = "Intermediate")]
    Intermediate,
    #[serde(alias = "Advanced")]
    Advanced,
    #[serde(alias = "Expert")]
    Expert,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Expert,
    ];

    /// Rate multiplier applied by the fairness calculator
    pub fn multiplier(self) -> f64 {
        match self {
            SkillLevel::Beginner => 0.7,
            SkillLevel::Intermediate => 1.0,
            SkillLevel::Advanced => 1.3,
            SkillLevel::Expert => 1.6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }
}

/// A skill a user offers or needs. Unique per (user, skill, type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserSkill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skill_id: Uuid,
    #[serde(rename = "type")]
    pub skill_type: SkillType,
    pub level: Option<SkillLevel>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveUserSkillRequest {
    #[validate(required(message = "Please select a skill"))]
    pub skill_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub skill_type: SkillType,
    #[serde(default)]
    pub level: Option<SkillLevel>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 200, message = "Description must be under 200 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUserSkill {
    pub skill_id: Uuid,
    pub skill_type: SkillType,
    pub level: Option<SkillLevel>,
    pub description: Option<String>,
}

/// Inventory entry with the skill's display names resolved
#[derive(Debug, Clone, Serialize)]
pub struct UserSkillView {
    #[serde(flatten)]
    pub user_skill: UserSkill,
    pub skill_name: String,
    pub category_name: Option<String>,
}
