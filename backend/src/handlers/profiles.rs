use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::{
    auth::Session,
    error::AppResult,
    models::{PublicProfile, SaveUserSkillRequest, UpdateProfileRequest, UserProfile, UserSkill, UserSkillView},
    services::profiles,
    state::AppState,
};

pub async fn get_profile(State(state): State<AppState>, session: Session) -> AppResult<Json<UserProfile>> {
    Ok(Json(profiles::get_own_profile(state.store.as_ref(), &session).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(profiles::save_profile(state.store.as_ref(), &session, req).await?))
}

pub async fn get_public_profile(
    State(state): State<AppState>,
    _session: Session,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<PublicProfile>> {
    Ok(Json(profiles::public_profile(state.store.as_ref(), user_id).await?))
}

pub async fn list_skills(State(state): State<AppState>, session: Session) -> AppResult<Json<Vec<UserSkillView>>> {
    Ok(Json(profiles::list_inventory(state.store.as_ref(), &session).await?))
}

pub async fn save_skill(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SaveUserSkillRequest>,
) -> AppResult<Json<UserSkill>> {
    Ok(Json(profiles::save_user_skill(state.store.as_ref(), &session, req).await?))
}

pub async fn delete_skill(
    State(state): State<AppState>,
    session: Session,
    Path(user_skill_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    profiles::remove_user_skill(state.store.as_ref(), &session, user_skill_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
