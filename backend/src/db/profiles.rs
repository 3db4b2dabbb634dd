use crate::models::{NewUserSkill, ProfileUpdate, PublicProfile, UserProfile, UserSkill};
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<UserProfile>> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, user_id, name, bio, location, portfolio_url, avatar_url, created_at, updated_at
        FROM user_profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

pub async fn upsert_profile(pool: &PgPool, user_id: Uuid, update: &ProfileUpdate) -> Result<UserProfile> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO user_profiles (user_id, name, bio, location, portfolio_url, avatar_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id) DO UPDATE SET
            name = EXCLUDED.name,
            bio = EXCLUDED.bio,
            location = EXCLUDED.location,
            portfolio_url = EXCLUDED.portfolio_url,
            avatar_url = EXCLUDED.avatar_url,
            updated_at = NOW()
        RETURNING id, user_id, name, bio, location, portfolio_url, avatar_url, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(&update.name)
    .bind(&update.bio)
    .bind(&update.location)
    .bind(&update.portfolio_url)
    .bind(&update.avatar_url)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

pub async fn profiles_by_user_ids(pool: &PgPool, user_ids: &[Uuid]) -> Result<Vec<PublicProfile>> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let profiles = sqlx::query_as::<_, PublicProfile>(
        r#"
        SELECT user_id, name, avatar_url
        FROM user_profiles
        WHERE user_id = ANY($1)
        "#,
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await?;

    Ok(profiles)
}

pub async fn list_user_skills(pool: &PgPool, user_id: Uuid) -> Result<Vec<UserSkill>> {
    let skills = sqlx::query_as::<_, UserSkill>(
        r#"
        SELECT id, user_id, skill_id, skill_type, level, description, created_at
        FROM user_skills
        WHERE user_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(skills)
}

pub async fn upsert_user_skill(pool: &PgPool, user_id: Uuid, skill: &NewUserSkill) -> Result<UserSkill> {
    let row = sqlx::query_as::<_, UserSkill>(
        r#"
        INSERT INTO user_skills (user_id, skill_id, skill_type, level, description)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, skill_id, skill_type) DO UPDATE SET
            level = EXCLUDED.level,
            description = EXCLUDED.description
        RETURNING id, user_id, skill_id, skill_type, level, description, created_at
        "#,
    )
    .bind(user_id)
    .bind(skill.skill_id)
    .bind(skill.skill_type)
    .bind(skill.level)
    .bind(&skill.description)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn delete_user_skill(pool: &PgPool, user_id: Uuid, user_skill_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM user_skills
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(user_skill_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
