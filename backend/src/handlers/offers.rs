use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::{
    auth::Session,
    error::AppResult,
    models::{OfferView, ProposeOfferRequest, SwapOffer},
    services::offers,
    state::AppState,
};

pub async fn list_offers(State(state): State<AppState>, session: Session) -> AppResult<Json<Vec<OfferView>>> {
    Ok(Json(offers::offers_for_user(state.store.as_ref(), &session).await?))
}

pub async fn propose_offer(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<ProposeOfferRequest>,
) -> AppResult<(StatusCode, Json<SwapOffer>)> {
    let offer = offers::propose_offer(state.store.as_ref(), &session, req).await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

pub async fn accept_offer(
    State(state): State<AppState>,
    session: Session,
    Path(offer_id): Path<Uuid>,
) -> AppResult<Json<SwapOffer>> {
    Ok(Json(offers::accept_offer(state.store.as_ref(), &session, offer_id).await?))
}

pub async fn reject_offer(
    State(state): State<AppState>,
    session: Session,
    Path(offer_id): Path<Uuid>,
) -> AppResult<Json<SwapOffer>> {
    Ok(Json(offers::reject_offer(state.store.as_ref(), &session, offer_id).await?))
}

pub async fn complete_offer(
    State(state): State<AppState>,
    session: Session,
    Path(offer_id): Path<Uuid>,
) -> AppResult<Json<SwapOffer>> {
    Ok(Json(offers::complete_offer(state.store.as_ref(), &session, offer_id).await?))
}
