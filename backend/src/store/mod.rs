//! Persistence abstraction for the marketplace tables.
//!
//! Services only ever talk to a `SwapStore`, which keeps the swap, offer and
//! messaging rules testable without a running database.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::*;

pub use memory::MemoryStore;

#[async_trait]
pub trait SwapStore: Send + Sync {
    // Skill catalog (read-only reference data)

    async fn list_categories(&self) -> Result<Vec<SkillCategory>>;

    /// All skills ordered by name, with their category name when present.
    async fn list_skills(&self) -> Result<Vec<SkillWithCategory>>;

    async fn skills_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Skill>>;

    // Profiles

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>>;

    /// Creates the profile on first save, updates it in place afterwards.
    async fn upsert_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> Result<UserProfile>;

    async fn profiles_by_user_ids(&self, user_ids: &[Uuid]) -> Result<Vec<PublicProfile>>;

    // Skill inventory

    async fn list_user_skills(&self, user_id: Uuid) -> Result<Vec<UserSkill>>;

    /// Keyed on (user, skill, type): re-saving updates level and description.
    async fn upsert_user_skill(&self, user_id: Uuid, skill: &NewUserSkill) -> Result<UserSkill>;

    /// Returns `false` when no row owned by `user_id` had that id.
    async fn delete_user_skill(&self, user_id: Uuid, user_skill_id: Uuid) -> Result<bool>;

    // Listings

    async fn insert_listing(&self, listing: &NewListing) -> Result<SwapListing>;

    async fn get_listing(&self, listing_id: Uuid) -> Result<Option<SwapListing>>;

    async fn listings_by_ids(&self, ids: &[Uuid]) -> Result<Vec<SwapListing>>;

    /// Active listings, newest first.
    async fn active_listings(&self) -> Result<Vec<SwapListing>>;

    async fn set_listing_status(
        &self,
        listing_id: Uuid,
        status: ListingStatus,
    ) -> Result<Option<SwapListing>>;

    // Offers

    async fn insert_offer(&self, offer: &NewOffer) -> Result<SwapOffer>;

    async fn get_offer(&self, offer_id: Uuid) -> Result<Option<SwapOffer>>;

    /// Offers where `user_id` is the proposer or owns the referenced listing, newest first.
    async fn offers_for_user(&self, user_id: Uuid) -> Result<Vec<SwapOffer>>;

    /// Conditional status update. Returns `None` (and changes nothing) when the
    /// offer is missing or its current status is not `from`.
    async fn transition_offer(
        &self,
        offer_id: Uuid,
        from: OfferStatus,
        to: OfferStatus,
    ) -> Result<Option<SwapOffer>>;

    // Messages

    async fn insert_message(&self, message: &NewMessage) -> Result<Message>;

    /// Messages between the two users in either direction, oldest first.
    async fn conversation(&self, user_a: Uuid, user_b: Uuid) -> Result<Vec<Message>>;

    /// Every message the user sent or received, newest first.
    async fn messages_for_user(&self, user_id: Uuid) -> Result<Vec<Message>>;

    /// Stamps `read_at` on unread messages from `sender` to `reader`.
    /// Returns the number of messages newly marked.
    async fn mark_read(&self, reader: Uuid, sender: Uuid, at: DateTime<Utc>) -> Result<u64>;
}
