use crate::models::{NewOffer, OfferStatus, SwapOffer};
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

const OFFER_COLUMNS: &str = "id, listing_id, proposer_id, offering_skill_id, needing_skill_id, \
     proposed_hours, proposed_delivery_time, message, status, created_at, updated_at";

pub async fn insert_offer(pool: &PgPool, offer: &NewOffer) -> Result<SwapOffer> {
    let row = sqlx::query_as::<_, SwapOffer>(&format!(
        r#"
        INSERT INTO swap_offers
            (listing_id, proposer_id, offering_skill_id, needing_skill_id,
             proposed_hours, proposed_delivery_time, message)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {OFFER_COLUMNS}
        "#
    ))
    .bind(offer.listing_id)
    .bind(offer.proposer_id)
    .bind(offer.offering_skill_id)
    .bind(offer.needing_skill_id)
    .bind(offer.proposed_hours)
    .bind(&offer.proposed_delivery_time)
    .bind(&offer.message)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_offer(pool: &PgPool, offer_id: Uuid) -> Result<Option<SwapOffer>> {
    let row = sqlx::query_as::<_, SwapOffer>(&format!(
        "SELECT {OFFER_COLUMNS} FROM swap_offers WHERE id = $1"
    ))
    .bind(offer_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Offers the user proposed plus offers made on the user's listings
pub async fn offers_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<SwapOffer>> {
    let rows = sqlx::query_as::<_, SwapOffer>(
        r#"
        SELECT o.id, o.listing_id, o.proposer_id, o.offering_skill_id, o.needing_skill_id,
               o.proposed_hours, o.proposed_delivery_time, o.message, o.status,
               o.created_at, o.updated_at
        FROM swap_offers o
        JOIN swap_listings l ON l.id = o.listing_id
        WHERE o.proposer_id = $1 OR l.user_id = $1
        ORDER BY o.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Compare-and-set on the offer status; `None` when the row is gone or already moved on
pub async fn transition_offer(
    pool: &PgPool,
    offer_id: Uuid,
    from: OfferStatus,
    to: OfferStatus,
) -> Result<Option<SwapOffer>> {
    let row = sqlx::query_as::<_, SwapOffer>(&format!(
        r#"
        UPDATE swap_offers
        SET status = $3, updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING {OFFER_COLUMNS}
        "#
    ))
    .bind(offer_id)
    .bind(from)
    .bind(to)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
