use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::PublicProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "listing_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Closed,
}

/// Public posting pairing one offered skill with one needed skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SwapListing {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub offering_skill_id: Uuid,
    pub needing_skill_id: Uuid,
    pub estimated_hours: i32,
    pub delivery_time: String,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SwapListing {
    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[validate(length(min = 5, message = "Title must be at least 5 characters"))]
    pub title: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    #[validate(required(message = "Please select a skill you're offering"))]
    pub offering_skill_id: Option<Uuid>,
    #[validate(required(message = "Please select a skill you need"))]
    pub needing_skill_id: Option<Uuid>,
    #[validate(range(min = 1, max = 100, message = "Hours must be between 1 and 100"))]
    pub estimated_hours: i32,
    #[validate(length(min = 1, message = "Delivery time is required"))]
    pub delivery_time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub offering_skill_id: Uuid,
    pub needing_skill_id: Uuid,
    pub estimated_hours: i32,
    pub delivery_time: String,
}

/// Listing with owner profile and skill names resolved for the board
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub listing: SwapListing,
    pub owner: Option<PublicProfile>,
    pub owner_name: String,
    pub offering_skill_name: String,
    pub needing_skill_name: String,
}

impl ListingView {
    /// Case-insensitive substring match over title, description and both skill names
    pub fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }

        let term = term.to_lowercase();
        [
            &self.listing.title,
            &self.listing.description,
            &self.offering_skill_name,
            &self.needing_skill_name,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }
}
