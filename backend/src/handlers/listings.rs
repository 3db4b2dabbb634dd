use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::Session,
    error::AppResult,
    models::{CreateListingRequest, ListingView, SwapListing},
    services::listings,
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub search: Option<String>,
}

/// Active listings, optionally narrowed by `?search=`
pub async fn list_listings(
    State(state): State<AppState>,
    _session: Session,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<ListingView>>> {
    let board = listings::list_active_listings(state.store.as_ref()).await?;
    let board = match query.search.as_deref() {
        Some(term) => listings::filter_listings(board, term),
        None => board,
    };
    Ok(Json(board))
}

pub async fn create_listing(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CreateListingRequest>,
) -> AppResult<(StatusCode, Json<SwapListing>)> {
    let listing = listings::create_listing(state.store.as_ref(), &session, req).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

pub async fn close_listing(
    State(state): State<AppState>,
    session: Session,
    Path(listing_id): Path<Uuid>,
) -> AppResult<Json<SwapListing>> {
    Ok(Json(listings::close_listing(state.store.as_ref(), &session, listing_id).await?))
}
