use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::{
    auth::Session,
    error::AppResult,
    models::{ConversationSummary, Message, MessageView, SendMessageRequest},
    services::messaging,
    state::AppState,
};

pub async fn list_conversations(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<ConversationSummary>>> {
    Ok(Json(messaging::conversations(state.store.as_ref(), &session).await?))
}

/// Returns the thread with `partner_id` after marking it read
pub async fn open_conversation(
    State(state): State<AppState>,
    session: Session,
    Path(partner_id): Path<Uuid>,
) -> AppResult<Json<Vec<MessageView>>> {
    Ok(Json(
        messaging::open_conversation(state.store.as_ref(), &session, partner_id).await?,
    ))
}

pub async fn send_message(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<Message>)> {
    let message = messaging::send_message(state.store.as_ref(), &session, req).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
