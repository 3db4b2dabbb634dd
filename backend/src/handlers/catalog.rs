use axum::{extract::State, response::Json};

use crate::{
    error::AppResult,
    models::{SkillCategory, SkillWithCategory},
    services::catalog,
    state::AppState,
};

pub async fn list_skills(State(state): State<AppState>) -> AppResult<Json<Vec<SkillWithCategory>>> {
    Ok(Json(catalog::list_skills(state.store.as_ref()).await?))
}

pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<SkillCategory>>> {
    Ok(Json(catalog::list_categories(state.store.as_ref()).await?))
}
