use crate::models::{ListingStatus, NewListing, SwapListing};
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

const LISTING_COLUMNS: &str = "id, user_id, title, description, offering_skill_id, needing_skill_id, \
     estimated_hours, delivery_time, status, created_at, updated_at";

pub async fn insert_listing(pool: &PgPool, listing: &NewListing) -> Result<SwapListing> {
    let row = sqlx::query_as::<_, SwapListing>(&format!(
        r#"
        INSERT INTO swap_listings
            (user_id, title, description, offering_skill_id, needing_skill_id, estimated_hours, delivery_time)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {LISTING_COLUMNS}
        "#
    ))
    .bind(listing.user_id)
    .bind(&listing.title)
    .bind(&listing.description)
    .bind(listing.offering_skill_id)
    .bind(listing.needing_skill_id)
    .bind(listing.estimated_hours)
    .bind(&listing.delivery_time)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_listing(pool: &PgPool, listing_id: Uuid) -> Result<Option<SwapListing>> {
    let row = sqlx::query_as::<_, SwapListing>(&format!(
        "SELECT {LISTING_COLUMNS} FROM swap_listings WHERE id = $1"
    ))
    .bind(listing_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn listings_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<SwapListing>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, SwapListing>(&format!(
        "SELECT {LISTING_COLUMNS} FROM swap_listings WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn active_listings(pool: &PgPool) -> Result<Vec<SwapListing>> {
    let rows = sqlx::query_as::<_, SwapListing>(&format!(
        r#"
        SELECT {LISTING_COLUMNS}
        FROM swap_listings
        WHERE status = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(ListingStatus::Active)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn set_listing_status(
    pool: &PgPool,
    listing_id: Uuid,
    status: ListingStatus,
) -> Result<Option<SwapListing>> {
    let row = sqlx::query_as::<_, SwapListing>(&format!(
        r#"
        UPDATE swap_listings
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {LISTING_COLUMNS}
        "#
    ))
    .bind(listing_id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
