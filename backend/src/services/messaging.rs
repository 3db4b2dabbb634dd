use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::lookup::Lookup;
use crate::{
    auth::Session,
    error::{AppError, AppResult},
    models::{ConversationSummary, Message, MessageView, NewMessage, SendMessageRequest},
    store::SwapStore,
};

/// Sends a message, optionally threaded onto an offer both sides take part in.
pub async fn send_message(
    store: &dyn SwapStore,
    session: &Session,
    req: SendMessageRequest,
) -> AppResult<Message> {
    req.validate()?;

    let content = req.content.trim();
    if content.is_empty() {
        return Err(AppError::invalid("content", "Message cannot be empty"));
    }
    if req.recipient_id == session.user_id {
        return Err(AppError::invalid("recipient_id", "You cannot message yourself"));
    }

    if let Some(offer_id) = req.swap_offer_id {
        let offer = store
            .get_offer(offer_id)
            .await?
            .ok_or(AppError::NotFound("offer"))?;
        let listing = store
            .get_listing(offer.listing_id)
            .await?
            .ok_or(AppError::NotFound("listing"))?;

        let participants = [offer.proposer_id, listing.user_id];
        if !participants.contains(&session.user_id) {
            return Err(AppError::Forbidden("You are not part of this swap.".to_string()));
        }
        if !participants.contains(&req.recipient_id) {
            return Err(AppError::Forbidden(
                "Messages about a swap can only go to the other participant.".to_string(),
            ));
        }
    }

    let message = store
        .insert_message(&NewMessage {
            sender_id: session.user_id,
            recipient_id: req.recipient_id,
            content: content.to_string(),
            swap_offer_id: req.swap_offer_id,
        })
        .await?;

    info!("Message {} sent from {} to {}", message.id, session.user_id, req.recipient_id);
    Ok(message)
}

/// Full thread with one partner, oldest first
pub async fn load_conversation(
    store: &dyn SwapStore,
    session: &Session,
    partner_id: Uuid,
) -> AppResult<Vec<MessageView>> {
    let messages = store.conversation(session.user_id, partner_id).await?;
    let lookup = Lookup::load(store, [session.user_id, partner_id], []).await?;

    Ok(messages
        .into_iter()
        .map(|message| MessageView {
            sender_profile: lookup.profile(message.sender_id),
            recipient_profile: lookup.profile(message.recipient_id),
            message,
        })
        .collect())
}

pub async fn mark_conversation_read(
    store: &dyn SwapStore,
    session: &Session,
    partner_id: Uuid,
) -> AppResult<u64> {
    let marked = store.mark_read(session.user_id, partner_id, Utc::now()).await?;
    if marked > 0 {
        debug!("Marked {} messages from {} read for {}", marked, partner_id, session.user_id);
    }
    Ok(marked)
}

/// Opening a thread marks what the partner sent as read, then returns it.
pub async fn open_conversation(
    store: &dyn SwapStore,
    session: &Session,
    partner_id: Uuid,
) -> AppResult<Vec<MessageView>> {
    mark_conversation_read(store, session, partner_id).await?;
    load_conversation(store, session, partner_id).await
}

/// Inbox: one entry per partner, most recent exchange first
pub async fn conversations(store: &dyn SwapStore, session: &Session) -> AppResult<Vec<ConversationSummary>> {
    let messages = store.messages_for_user(session.user_id).await?;

    // messages arrive newest first, so the first one seen per partner is the latest
    let mut order: Vec<Uuid> = Vec::new();
    let mut latest: HashMap<Uuid, Message> = HashMap::new();
    let mut unread: HashMap<Uuid, usize> = HashMap::new();

    for message in messages {
        let partner = message.partner_of(session.user_id);
        if message.is_unread_by(session.user_id) {
            *unread.entry(partner).or_default() += 1;
        }
        if !latest.contains_key(&partner) {
            order.push(partner);
            latest.insert(partner, message);
        }
    }

    let lookup = Lookup::load(store, order.iter().copied(), []).await?;

    Ok(order
        .into_iter()
        .filter_map(|partner_id| {
            let last_message = latest.remove(&partner_id)?;
            Some(ConversationSummary {
                partner_id,
                partner_name: lookup.display_name(partner_id),
                partner: lookup.profile(partner_id),
                last_message,
                unread_count: unread.get(&partner_id).copied().unwrap_or(0),
            })
        })
        .collect())
}
