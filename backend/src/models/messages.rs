use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::PublicProfile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
    pub swap_offer_id: Option<Uuid>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// The participant that is not `user_id`
    pub fn partner_of(&self, user_id: Uuid) -> Uuid {
        if self.sender_id == user_id {
            self.recipient_id
        } else {
            self.sender_id
        }
    }

    pub fn is_unread_by(&self, user_id: Uuid) -> bool {
        self.recipient_id == user_id && self.read_at.is_none()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub recipient_id: Uuid,
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub content: String,
    #[serde(default)]
    pub swap_offer_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
    pub swap_offer_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    #[serde(flatten)]
    pub message: Message,
    pub sender_profile: Option<PublicProfile>,
    pub recipient_profile: Option<PublicProfile>,
}

/// One row of the inbox: a partner plus the latest exchange with them
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub partner_id: Uuid,
    pub partner_name: String,
    pub partner: Option<PublicProfile>,
    pub last_message: Message,
    pub unread_count: usize,
}
