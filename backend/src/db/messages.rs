use crate::models::{Message, NewMessage};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn insert_message(pool: &PgPool, message: &NewMessage) -> Result<Message> {
    let row = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (sender_id, recipient_id, content, swap_offer_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, sender_id, recipient_id, content, swap_offer_id, read_at, created_at
        "#,
    )
    .bind(message.sender_id)
    .bind(message.recipient_id)
    .bind(&message.content)
    .bind(message.swap_offer_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn conversation(pool: &PgPool, user_a: Uuid, user_b: Uuid) -> Result<Vec<Message>> {
    let rows = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, sender_id, recipient_id, content, swap_offer_id, read_at, created_at
        FROM messages
        WHERE (sender_id = $1 AND recipient_id = $2)
           OR (sender_id = $2 AND recipient_id = $1)
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn messages_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Message>> {
    let rows = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, sender_id, recipient_id, content, swap_offer_id, read_at, created_at
        FROM messages
        WHERE sender_id = $1 OR recipient_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn mark_read(pool: &PgPool, reader: Uuid, sender: Uuid, at: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE messages
        SET read_at = $3
        WHERE sender_id = $2 AND recipient_id = $1 AND read_at IS NULL
        "#,
    )
    .bind(reader)
    .bind(sender)
    .bind(at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
