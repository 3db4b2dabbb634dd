//! In-process store used by tests and local development.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::SwapStore;
use crate::models::*;

#[derive(Debug, Default)]
struct Tables {
    categories: Vec<SkillCategory>,
    skills: Vec<Skill>,
    profiles: Vec<UserProfile>,
    user_skills: Vec<UserSkill>,
    listings: Vec<SwapListing>,
    offers: Vec<SwapOffer>,
    messages: Vec<Message>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Tables {
    /// Strictly increasing clock so "newest first" is deterministic
    fn now(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(next);
        next
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_category(&self, name: &str) -> SkillCategory {
        let mut tables = self.tables.write().await;
        let category = SkillCategory {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            created_at: tables.now(),
        };
        tables.categories.push(category.clone());
        category
    }

    pub async fn add_skill(&self, name: &str, category_id: Option<Uuid>) -> Skill {
        let mut tables = self.tables.write().await;
        let skill = Skill {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category_id,
            created_at: tables.now(),
        };
        tables.skills.push(skill.clone());
        skill
    }

    /// Row count of the user skill table, for asserting upsert behaviour
    pub async fn user_skill_rows(&self) -> usize {
        self.tables.read().await.user_skills.len()
    }
}

fn newest_first<T, F>(rows: &mut [T], created_at: F)
where
    F: Fn(&T) -> DateTime<Utc>,
{
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

#[async_trait]
impl SwapStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<SkillCategory>> {
        let mut categories = self.tables.read().await.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn list_skills(&self) -> Result<Vec<SkillWithCategory>> {
        let tables = self.tables.read().await;
        let mut skills: Vec<SkillWithCategory> = tables
            .skills
            .iter()
            .map(|skill| SkillWithCategory {
                id: skill.id,
                name: skill.name.clone(),
                category_id: skill.category_id,
                category_name: skill.category_id.and_then(|category_id| {
                    tables
                        .categories
                        .iter()
                        .find(|category| category.id == category_id)
                        .map(|category| category.name.clone())
                }),
            })
            .collect();
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    async fn skills_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Skill>> {
        let tables = self.tables.read().await;
        Ok(tables
            .skills
            .iter()
            .filter(|skill| ids.contains(&skill.id))
            .cloned()
            .collect())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn upsert_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> Result<UserProfile> {
        let mut tables = self.tables.write().await;
        let now = tables.now();

        if let Some(profile) = tables.profiles.iter_mut().find(|p| p.user_id == user_id) {
            profile.name = update.name.clone();
            profile.bio = update.bio.clone();
            profile.location = update.location.clone();
            profile.portfolio_url = update.portfolio_url.clone();
            profile.avatar_url = update.avatar_url.clone();
            profile.updated_at = now;
            return Ok(profile.clone());
        }

        let profile = UserProfile {
            id: Uuid::new_v4(),
            user_id,
            name: update.name.clone(),
            bio: update.bio.clone(),
            location: update.location.clone(),
            portfolio_url: update.portfolio_url.clone(),
            avatar_url: update.avatar_url.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn profiles_by_user_ids(&self, user_ids: &[Uuid]) -> Result<Vec<PublicProfile>> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .iter()
            .filter(|p| user_ids.contains(&p.user_id))
            .map(PublicProfile::from)
            .collect())
    }

    async fn list_user_skills(&self, user_id: Uuid) -> Result<Vec<UserSkill>> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_skills
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert_user_skill(&self, user_id: Uuid, skill: &NewUserSkill) -> Result<UserSkill> {
        let mut tables = self.tables.write().await;

        if !tables.skills.iter().any(|s| s.id == skill.skill_id) {
            return Err(anyhow!("skill {} does not exist", skill.skill_id));
        }

        if let Some(existing) = tables.user_skills.iter_mut().find(|s| {
            s.user_id == user_id && s.skill_id == skill.skill_id && s.skill_type == skill.skill_type
        }) {
            existing.level = skill.level;
            existing.description = skill.description.clone();
            return Ok(existing.clone());
        }

        let row = UserSkill {
            id: Uuid::new_v4(),
            user_id,
            skill_id: skill.skill_id,
            skill_type: skill.skill_type,
            level: skill.level,
            description: skill.description.clone(),
            created_at: tables.now(),
        };
        tables.user_skills.push(row.clone());
        Ok(row)
    }

    async fn delete_user_skill(&self, user_id: Uuid, user_skill_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.user_skills.len();
        tables
            .user_skills
            .retain(|s| !(s.id == user_skill_id && s.user_id == user_id));
        Ok(tables.user_skills.len() < before)
    }

    async fn insert_listing(&self, listing: &NewListing) -> Result<SwapListing> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        let row = SwapListing {
            id: Uuid::new_v4(),
            user_id: listing.user_id,
            title: listing.title.clone(),
            description: listing.description.clone(),
            offering_skill_id: listing.offering_skill_id,
            needing_skill_id: listing.needing_skill_id,
            estimated_hours: listing.estimated_hours,
            delivery_time: listing.delivery_time.clone(),
            status: ListingStatus::Active,
            created_at: now,
            updated_at: now,
        };
        tables.listings.push(row.clone());
        Ok(row)
    }

    async fn get_listing(&self, listing_id: Uuid) -> Result<Option<SwapListing>> {
        let tables = self.tables.read().await;
        Ok(tables.listings.iter().find(|l| l.id == listing_id).cloned())
    }

    async fn listings_by_ids(&self, ids: &[Uuid]) -> Result<Vec<SwapListing>> {
        let tables = self.tables.read().await;
        Ok(tables
            .listings
            .iter()
            .filter(|l| ids.contains(&l.id))
            .cloned()
            .collect())
    }

    async fn active_listings(&self) -> Result<Vec<SwapListing>> {
        let mut listings: Vec<SwapListing> = self
            .tables
            .read()
            .await
            .listings
            .iter()
            .filter(|l| l.is_active())
            .cloned()
            .collect();
        newest_first(&mut listings, |l| l.created_at);
        Ok(listings)
    }

    async fn set_listing_status(
        &self,
        listing_id: Uuid,
        status: ListingStatus,
    ) -> Result<Option<SwapListing>> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        Ok(tables
            .listings
            .iter_mut()
            .find(|l| l.id == listing_id)
            .map(|listing| {
                listing.status = status;
                listing.updated_at = now;
                listing.clone()
            }))
    }

    async fn insert_offer(&self, offer: &NewOffer) -> Result<SwapOffer> {
        let mut tables = self.tables.write().await;

        if !tables.listings.iter().any(|l| l.id == offer.listing_id) {
            return Err(anyhow!("listing {} does not exist", offer.listing_id));
        }

        let now = tables.now();
        let row = SwapOffer {
            id: Uuid::new_v4(),
            listing_id: offer.listing_id,
            proposer_id: offer.proposer_id,
            offering_skill_id: offer.offering_skill_id,
            needing_skill_id: offer.needing_skill_id,
            proposed_hours: offer.proposed_hours,
            proposed_delivery_time: offer.proposed_delivery_time.clone(),
            message: offer.message.clone(),
            status: OfferStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.offers.push(row.clone());
        Ok(row)
    }

    async fn get_offer(&self, offer_id: Uuid) -> Result<Option<SwapOffer>> {
        let tables = self.tables.read().await;
        Ok(tables.offers.iter().find(|o| o.id == offer_id).cloned())
    }

    async fn offers_for_user(&self, user_id: Uuid) -> Result<Vec<SwapOffer>> {
        let tables = self.tables.read().await;
        let owned_listings: HashSet<Uuid> = tables
            .listings
            .iter()
            .filter(|l| l.user_id == user_id)
            .map(|l| l.id)
            .collect();

        let mut offers: Vec<SwapOffer> = tables
            .offers
            .iter()
            .filter(|o| o.proposer_id == user_id || owned_listings.contains(&o.listing_id))
            .cloned()
            .collect();
        newest_first(&mut offers, |o| o.created_at);
        Ok(offers)
    }

    async fn transition_offer(
        &self,
        offer_id: Uuid,
        from: OfferStatus,
        to: OfferStatus,
    ) -> Result<Option<SwapOffer>> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        Ok(tables
            .offers
            .iter_mut()
            .find(|o| o.id == offer_id && o.status == from)
            .map(|offer| {
                offer.status = to;
                offer.updated_at = now;
                offer.clone()
            }))
    }

    async fn insert_message(&self, message: &NewMessage) -> Result<Message> {
        let mut tables = self.tables.write().await;

        if let Some(offer_id) = message.swap_offer_id {
            if !tables.offers.iter().any(|o| o.id == offer_id) {
                return Err(anyhow!("swap offer {} does not exist", offer_id));
            }
        }

        let row = Message {
            id: Uuid::new_v4(),
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            content: message.content.clone(),
            swap_offer_id: message.swap_offer_id,
            read_at: None,
            created_at: tables.now(),
        };
        tables.messages.push(row.clone());
        Ok(row)
    }

    async fn conversation(&self, user_a: Uuid, user_b: Uuid) -> Result<Vec<Message>> {
        let tables = self.tables.read().await;
        let mut messages: Vec<Message> = tables
            .messages
            .iter()
            .filter(|m| {
                (m.sender_id == user_a && m.recipient_id == user_b)
                    || (m.sender_id == user_b && m.recipient_id == user_a)
            })
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    async fn messages_for_user(&self, user_id: Uuid) -> Result<Vec<Message>> {
        let tables = self.tables.read().await;
        let mut messages: Vec<Message> = tables
            .messages
            .iter()
            .filter(|m| m.sender_id == user_id || m.recipient_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut messages, |m| m.created_at);
        Ok(messages)
    }

    async fn mark_read(&self, reader: Uuid, sender: Uuid, at: DateTime<Utc>) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let mut marked = 0;
        for message in tables
            .messages
            .iter_mut()
            .filter(|m| m.sender_id == sender && m.recipient_id == reader && m.read_at.is_none())
        {
            message.read_at = Some(at);
            marked += 1;
        }
        Ok(marked)
    }
}
