use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::PublicProfile;

/// Negotiation state of an offer.
///
/// `pending → accepted | rejected`, `accepted → completed`.
/// `rejected` and `completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "offer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

impl OfferStatus {
    pub fn can_transition_to(self, next: OfferStatus) -> bool {
        matches!(
            (self, next),
            (OfferStatus::Pending, OfferStatus::Accepted)
                | (OfferStatus::Pending, OfferStatus::Rejected)
                | (OfferStatus::Accepted, OfferStatus::Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OfferStatus::Rejected | OfferStatus::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
            OfferStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposal made against a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SwapOffer {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub proposer_id: Uuid,
    pub offering_skill_id: Uuid,
    pub needing_skill_id: Uuid,
    pub proposed_hours: i32,
    pub proposed_delivery_time: String,
    pub message: String,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProposeOfferRequest {
    pub listing_id: Option<Uuid>,
    #[validate(required(message = "Please select a skill you're offering"))]
    pub offering_skill_id: Option<Uuid>,
    #[validate(required(message = "Please select a skill you need"))]
    pub needing_skill_id: Option<Uuid>,
    #[validate(range(min = 1, max = 100, message = "Hours must be between 1 and 100"))]
    pub proposed_hours: i32,
    #[validate(length(min = 1, message = "Delivery time is required"))]
    pub proposed_delivery_time: String,
    #[validate(length(min = 10, message = "Message must be at least 10 characters"))]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOffer {
    pub listing_id: Uuid,
    pub proposer_id: Uuid,
    pub offering_skill_id: Uuid,
    pub needing_skill_id: Uuid,
    pub proposed_hours: i32,
    pub proposed_delivery_time: String,
    pub message: String,
}

/// Offer as shown to either participant
#[derive(Debug, Clone, Serialize)]
pub struct OfferView {
    #[serde(flatten)]
    pub offer: SwapOffer,
    pub listing_title: String,
    pub listing_owner_id: Uuid,
    pub proposer: Option<PublicProfile>,
    pub proposer_name: String,
    pub offering_skill_name: String,
    pub needing_skill_name: String,
}
