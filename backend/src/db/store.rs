use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{catalog, listings, messages, offers, profiles};
use crate::models::*;
use crate::store::SwapStore;

/// `SwapStore` backed by the Postgres pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SwapStore for PgStore {
    async fn list_categories(&self) -> Result<Vec<SkillCategory>> {
        catalog::list_categories(&self.pool).await
    }

    async fn list_skills(&self) -> Result<Vec<SkillWithCategory>> {
        catalog::list_skills(&self.pool).await
    }

    async fn skills_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Skill>> {
        catalog::skills_by_ids(&self.pool, ids).await
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        profiles::get_profile(&self.pool, user_id).await
    }

    async fn upsert_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> Result<UserProfile> {
        profiles::upsert_profile(&self.pool, user_id, update).await
    }

    async fn profiles_by_user_ids(&self, user_ids: &[Uuid]) -> Result<Vec<PublicProfile>> {
        profiles::profiles_by_user_ids(&self.pool, user_ids).await
    }

    async fn list_user_skills(&self, user_id: Uuid) -> Result<Vec<UserSkill>> {
        profiles::list_user_skills(&self.pool, user_id).await
    }

    async fn upsert_user_skill(&self, user_id: Uuid, skill: &NewUserSkill) -> Result<UserSkill> {
        profiles::upsert_user_skill(&self.pool, user_id, skill).await
    }

    async fn delete_user_skill(&self, user_id: Uuid, user_skill_id: Uuid) -> Result<bool> {
        profiles::delete_user_skill(&self.pool, user_id, user_skill_id).await
    }

    async fn insert_listing(&self, listing: &NewListing) -> Result<SwapListing> {
        listings::insert_listing(&self.pool, listing).await
    }

    async fn get_listing(&self, listing_id: Uuid) -> Result<Option<SwapListing>> {
        listings::get_listing(&self.pool, listing_id).await
    }

    async fn listings_by_ids(&self, ids: &[Uuid]) -> Result<Vec<SwapListing>> {
        listings::listings_by_ids(&self.pool, ids).await
    }

    async fn active_listings(&self) -> Result<Vec<SwapListing>> {
        listings::active_listings(&self.pool).await
    }

    async fn set_listing_status(
        &self,
        listing_id: Uuid,
        status: ListingStatus,
    ) -> Result<Option<SwapListing>> {
        listings::set_listing_status(&self.pool, listing_id, status).await
    }

    async fn insert_offer(&self, offer: &NewOffer) -> Result<SwapOffer> {
        offers::insert_offer(&self.pool, offer).await
    }

    async fn get_offer(&self, offer_id: Uuid) -> Result<Option<SwapOffer>> {
        offers::get_offer(&self.pool, offer_id).await
    }

    async fn offers_for_user(&self, user_id: Uuid) -> Result<Vec<SwapOffer>> {
        offers::offers_for_user(&self.pool, user_id).await
    }

    async fn transition_offer(
        &self,
        offer_id: Uuid,
        from: OfferStatus,
        to: OfferStatus,
    ) -> Result<Option<SwapOffer>> {
        offers::transition_offer(&self.pool, offer_id, from, to).await
    }

    async fn insert_message(&self, message: &NewMessage) -> Result<Message> {
        messages::insert_message(&self.pool, message).await
    }

    async fn conversation(&self, user_a: Uuid, user_b: Uuid) -> Result<Vec<Message>> {
        messages::conversation(&self.pool, user_a, user_b).await
    }

    async fn messages_for_user(&self, user_id: Uuid) -> Result<Vec<Message>> {
        messages::messages_for_user(&self.pool, user_id).await
    }

    async fn mark_read(&self, reader: Uuid, sender: Uuid, at: DateTime<Utc>) -> Result<u64> {
        messages::mark_read(&self.pool, reader, sender, at).await
    }
}
