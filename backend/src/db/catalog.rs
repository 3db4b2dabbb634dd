use crate::models::{Skill, SkillCategory, SkillWithCategory};
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn list_categories(pool: &PgPool) -> Result<Vec<SkillCategory>> {
    let categories = sqlx::query_as::<_, SkillCategory>(
        r#"
        SELECT id, name, description, created_at
        FROM skill_categories
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn list_skills(pool: &PgPool) -> Result<Vec<SkillWithCategory>> {
    let skills = sqlx::query_as::<_, SkillWithCategory>(
        r#"
        SELECT s.id, s.name, s.category_id, c.name AS category_name
        FROM skills s
        LEFT JOIN skill_categories c ON c.id = s.category_id
        ORDER BY s.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(skills)
}

pub async fn skills_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Skill>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let skills = sqlx::query_as::<_, Skill>(
        r#"
        SELECT id, name, category_id, created_at
        FROM skills
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(skills)
}

/// Inserts a category unless one with the same name exists; returns its id either way
pub async fn ensure_category(pool: &PgPool, name: &str, description: Option<&str>) -> Result<Uuid> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO skill_categories (name, description)
        VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET description = COALESCE(EXCLUDED.description, skill_categories.description)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Inserts a skill unless one with the same name exists; returns true if a row was created
pub async fn ensure_skill(pool: &PgPool, name: &str, category_id: Option<Uuid>) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO skills (name, category_id)
        VALUES ($1, $2)
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(name)
    .bind(category_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
