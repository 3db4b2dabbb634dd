//! Server-side relays for the strategy generator.
//!
//! `get-secret` and `generate-hashtags` keep the response contract of the
//! original serverless functions: `{error}` bodies with 400 for unknown or
//! malformed input, 404 for a missing secret and 500 for upstream failures.

use axum::{
    body::Bytes,
    extract::{ConnectInfo, FromRequestParts, State},
    http::{StatusCode, request::Parts},
    response::Json,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::{convert::Infallible, net::SocketAddr};

use crate::{
    auth::Session,
    constants::RELAY_SECRET_NAME,
    error::{AppError, AppResult},
    services::strategy::{self, BusinessProfile, FormProgress, GeneratedStrategy, HashtagRequest},
    state::AppState,
    utils::client_ip,
};

type RelayResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn relay_error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

/// Rate-limit key for the caller: the socket peer, or the proxy-reported
/// address when `trust_forwarded_headers` is set
pub struct ClientKey(pub String);

impl FromRequestParts<AppState> for ClientKey {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(ClientKey(client_ip(&parts.headers, peer, state.config.trust_forwarded_headers)))
    }
}

async fn check_rate_limit(state: &AppState, client: String) -> Result<String, (StatusCode, Json<Value>)> {
    if state.allow_relay_call(&client).await {
        Ok(client)
    } else {
        tracing::warn!("Relay rate limit hit by {}", client);
        Err(relay_error(
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded. Please try again later.",
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretRequest {
    secret_name: String,
}

/// Hands the generator key to signed-in clients
pub async fn get_secret(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    _session: Session,
    body: Bytes,
) -> RelayResult {
    let client = check_rate_limit(&state, client).await?;

    let req: SecretRequest = serde_json::from_slice(&body)
        .map_err(|_| relay_error(StatusCode::BAD_REQUEST, "Failed to process request"))?;

    if req.secret_name != RELAY_SECRET_NAME {
        return Err(relay_error(StatusCode::BAD_REQUEST, "Invalid secret name"));
    }

    let secret = state.config.gemini_api_key.as_deref().ok_or_else(|| {
        relay_error(StatusCode::NOT_FOUND, "API key not found in environment variables")
    })?;

    tracing::info!("Secret {} released to {}", req.secret_name, client);
    Ok(Json(json!({ "publicData": { "secret": secret } })))
}

pub async fn generate_hashtags(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    body: Bytes,
) -> RelayResult {
    let client = check_rate_limit(&state, client).await?;

    let req: HashtagRequest = serde_json::from_slice(&body)
        .map_err(|_| relay_error(StatusCode::BAD_REQUEST, "Failed to process request"))?;

    if state.config.gemini_api_key.is_none() {
        tracing::error!("Hashtag relay called without a configured GEMINI_API_KEY");
        return Err(relay_error(StatusCode::INTERNAL_SERVER_ERROR, "Gemini API key not found"));
    }

    tracing::info!("Generating hashtags for {} ({})", req.business_name, client);

    let hashtags = strategy::generate_hashtags(state.generator.as_ref(), &req)
        .await
        .map_err(|e| {
            tracing::error!("Hashtag generation failed: {}", e);
            relay_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate hashtags")
        })?;

    Ok(Json(json!({ "hashtags": hashtags })))
}

/// Validates the three-step profile, calls the model and returns parsed blocks
pub async fn generate_strategy(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    Json(profile): Json<BusinessProfile>,
) -> AppResult<Json<GeneratedStrategy>> {
    if !state.allow_relay_call(&client).await {
        return Err(AppError::RateLimited);
    }

    Ok(Json(
        strategy::generate_strategy(state.generator.as_ref(), profile).await?,
    ))
}

/// Reports which form steps are complete and where to resume
pub async fn strategy_progress(Json(profile): Json<BusinessProfile>) -> Json<FormProgress> {
    Json(strategy::form_progress(&profile))
}
