use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::{listings::ensure_skills_exist, lookup::Lookup};
use crate::{
    auth::Session,
    error::{AppError, AppResult},
    models::{NewOffer, OfferStatus, OfferView, ProposeOfferRequest, SwapListing, SwapOffer},
    store::SwapStore,
};

/// Who may drive a particular status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Actor {
    ListingOwner,
    Participant,
}

/// Creates a pending offer against an active listing owned by someone else.
pub async fn propose_offer(
    store: &dyn SwapStore,
    session: &Session,
    req: ProposeOfferRequest,
) -> AppResult<SwapOffer> {
    let listing_id = req
        .listing_id
        .ok_or_else(|| AppError::Precondition("No listing selected".to_string()))?;

    req.validate()?;

    let offering_skill_id = req
        .offering_skill_id
        .ok_or_else(|| AppError::invalid("offering_skill_id", "Please select a skill you're offering"))?;
    let needing_skill_id = req
        .needing_skill_id
        .ok_or_else(|| AppError::invalid("needing_skill_id", "Please select a skill you need"))?;

    let listing = store
        .get_listing(listing_id)
        .await?
        .ok_or(AppError::NotFound("listing"))?;

    if !listing.is_active() {
        return Err(AppError::Precondition("This listing is no longer active.".to_string()));
    }
    if listing.user_id == session.user_id {
        return Err(AppError::Forbidden("You cannot make an offer on your own listing.".to_string()));
    }

    ensure_skills_exist(store, offering_skill_id, needing_skill_id).await?;

    let offer = store
        .insert_offer(&NewOffer {
            listing_id,
            proposer_id: session.user_id,
            offering_skill_id,
            needing_skill_id,
            proposed_hours: req.proposed_hours,
            proposed_delivery_time: req.proposed_delivery_time,
            message: req.message,
        })
        .await?;

    info!(
        "User {} proposed offer {} on listing {}",
        session.user_id, offer.id, listing_id
    );
    Ok(offer)
}

pub async fn accept_offer(store: &dyn SwapStore, session: &Session, offer_id: Uuid) -> AppResult<SwapOffer> {
    transition(store, session, offer_id, OfferStatus::Accepted, Actor::ListingOwner).await
}

pub async fn reject_offer(store: &dyn SwapStore, session: &Session, offer_id: Uuid) -> AppResult<SwapOffer> {
    transition(store, session, offer_id, OfferStatus::Rejected, Actor::ListingOwner).await
}

/// Marks an accepted swap as delivered. Either side of the swap may do this.
pub async fn complete_offer(store: &dyn SwapStore, session: &Session, offer_id: Uuid) -> AppResult<SwapOffer> {
    transition(store, session, offer_id, OfferStatus::Completed, Actor::Participant).await
}

async fn transition(
    store: &dyn SwapStore,
    session: &Session,
    offer_id: Uuid,
    next: OfferStatus,
    actor: Actor,
) -> AppResult<SwapOffer> {
    let offer = store
        .get_offer(offer_id)
        .await?
        .ok_or(AppError::NotFound("offer"))?;
    let listing = store
        .get_listing(offer.listing_id)
        .await?
        .ok_or(AppError::NotFound("listing"))?;

    ensure_actor(session, &offer, &listing, actor)?;

    if !offer.status.can_transition_to(next) {
        return Err(AppError::Precondition(format!(
            "Offer is {} and cannot be marked {}.",
            offer.status, next
        )));
    }

    match store.transition_offer(offer_id, offer.status, next).await? {
        Some(updated) => {
            info!(
                "Offer {} moved {} -> {} by {}",
                offer_id, offer.status, next, session.user_id
            );
            Ok(updated)
        }
        None => {
            warn!("Offer {} changed underneath a {} transition", offer_id, next);
            Err(AppError::Precondition(
                "This offer was updated by someone else. Refresh and try again.".to_string(),
            ))
        }
    }
}

fn ensure_actor(session: &Session, offer: &SwapOffer, listing: &SwapListing, actor: Actor) -> AppResult<()> {
    let is_owner = listing.user_id == session.user_id;
    let allowed = match actor {
        Actor::ListingOwner => is_owner,
        Actor::Participant => is_owner || offer.proposer_id == session.user_id,
    };

    if allowed {
        Ok(())
    } else if actor == Actor::ListingOwner {
        Err(AppError::Forbidden("Only the listing owner can respond to this offer.".to_string()))
    } else {
        Err(AppError::Forbidden("You are not part of this swap.".to_string()))
    }
}

/// Offers the user sent or received, newest first
pub async fn offers_for_user(store: &dyn SwapStore, session: &Session) -> AppResult<Vec<OfferView>> {
    let offers = store.offers_for_user(session.user_id).await?;
    if offers.is_empty() {
        return Ok(Vec::new());
    }

    let mut listing_ids: Vec<Uuid> = offers.iter().map(|o| o.listing_id).collect();
    listing_ids.sort();
    listing_ids.dedup();
    let listings = store.listings_by_ids(&listing_ids).await?;

    let lookup = Lookup::load(
        store,
        offers.iter().map(|o| o.proposer_id),
        offers.iter().flat_map(|o| [o.offering_skill_id, o.needing_skill_id]),
    )
    .await?;

    Ok(offers
        .into_iter()
        .filter_map(|offer| {
            let listing = listings.iter().find(|l| l.id == offer.listing_id)?;
            Some(OfferView {
                listing_title: listing.title.clone(),
                listing_owner_id: listing.user_id,
                proposer: lookup.profile(offer.proposer_id),
                proposer_name: lookup.display_name(offer.proposer_id),
                offering_skill_name: lookup.skill_name(offer.offering_skill_id),
                needing_skill_name: lookup.skill_name(offer.needing_skill_id),
                offer,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{CreateListingRequest, ListingStatus},
        services::listings::{close_listing, create_listing},
        store::MemoryStore,
    };

    struct Fixture {
        store: MemoryStore,
        owner: Session,
        proposer: Session,
        listing: SwapListing,
        skills: (Uuid, Uuid),
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let web = store.add_skill("Web Development", None).await.id;
        let logo = store.add_skill("Logo Design", None).await.id;
        let owner = Session::new(Uuid::new_v4());
        let proposer = Session::new(Uuid::new_v4());

        let listing = create_listing(
            &store,
            &owner,
            CreateListingRequest {
                title: "Website for a logo".to_string(),
                description: "I will build a small site for a new logo".to_string(),
                offering_skill_id: Some(web),
                needing_skill_id: Some(logo),
                estimated_hours: 10,
                delivery_time: "1 week".to_string(),
            },
        )
        .await
        .unwrap();

        Fixture {
            store,
            owner,
            proposer,
            listing,
            skills: (logo, web),
        }
    }

    fn offer_request(f: &Fixture) -> ProposeOfferRequest {
        ProposeOfferRequest {
            listing_id: Some(f.listing.id),
            offering_skill_id: Some(f.skills.0),
            needing_skill_id: Some(f.skills.1),
            proposed_hours: 8,
            proposed_delivery_time: "10 days".to_string(),
            message: "Happy to do your logo in return".to_string(),
        }
    }

    #[tokio::test]
    async fn test_offer_lifecycle() {
        let f = fixture().await;
        let offer = propose_offer(&f.store, &f.proposer, offer_request(&f)).await.unwrap();
        assert_eq!(offer.status, OfferStatus::Pending);
        assert_eq!(offer.proposer_id, f.proposer.user_id);

        let accepted = accept_offer(&f.store, &f.owner, offer.id).await.unwrap();
        assert_eq!(accepted.status, OfferStatus::Accepted);

        let completed = complete_offer(&f.store, &f.proposer, offer.id).await.unwrap();
        assert_eq!(completed.status, OfferStatus::Completed);

        assert!(matches!(
            reject_offer(&f.store, &f.owner, offer.id).await,
            Err(AppError::Precondition(_))
        ));
    }

    #[tokio::test]
    async fn test_only_owner_responds() {
        let f = fixture().await;
        let offer = propose_offer(&f.store, &f.proposer, offer_request(&f)).await.unwrap();

        assert!(matches!(
            accept_offer(&f.store, &f.proposer, offer.id).await,
            Err(AppError::Forbidden(_))
        ));
        let stranger = Session::new(Uuid::new_v4());
        assert!(matches!(
            reject_offer(&f.store, &stranger, offer.id).await,
            Err(AppError::Forbidden(_))
        ));

        let rejected = reject_offer(&f.store, &f.owner, offer.id).await.unwrap();
        assert_eq!(rejected.status, OfferStatus::Rejected);
        assert!(accept_offer(&f.store, &f.owner, offer.id).await.is_err());
    }

    #[tokio::test]
    async fn test_pending_offer_cannot_complete() {
        let f = fixture().await;
        let offer = propose_offer(&f.store, &f.proposer, offer_request(&f)).await.unwrap();
        assert!(matches!(
            complete_offer(&f.store, &f.owner, offer.id).await,
            Err(AppError::Precondition(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_listing_is_precondition() {
        let f = fixture().await;
        let mut req = offer_request(&f);
        req.listing_id = None;
        assert!(matches!(
            propose_offer(&f.store, &f.proposer, req).await,
            Err(AppError::Precondition(_))
        ));
    }

    #[tokio::test]
    async fn test_offer_validation() {
        let f = fixture().await;

        let mut short_message = offer_request(&f);
        short_message.message = "hi there".to_string();
        assert!(matches!(
            propose_offer(&f.store, &f.proposer, short_message).await,
            Err(AppError::Validation { .. })
        ));

        let mut too_many_hours = offer_request(&f);
        too_many_hours.proposed_hours = 101;
        assert!(matches!(
            propose_offer(&f.store, &f.proposer, too_many_hours).await,
            Err(AppError::Validation { .. })
        ));

        assert!(offers_for_user(&f.store, &f.proposer).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_own_and_closed_listings_rejected() {
        let f = fixture().await;
        assert!(matches!(
            propose_offer(&f.store, &f.owner, offer_request(&f)).await,
            Err(AppError::Forbidden(_))
        ));

        let closed = close_listing(&f.store, &f.owner, f.listing.id).await.unwrap();
        assert_eq!(closed.status, ListingStatus::Closed);
        assert!(matches!(
            propose_offer(&f.store, &f.proposer, offer_request(&f)).await,
            Err(AppError::Precondition(_))
        ));
    }

    #[tokio::test]
    async fn test_lost_race_reports_conflict() {
        let f = fixture().await;
        let offer = propose_offer(&f.store, &f.proposer, offer_request(&f)).await.unwrap();

        // Someone else settles the offer between our read and our write.
        f.store
            .transition_offer(offer.id, OfferStatus::Pending, OfferStatus::Rejected)
            .await
            .unwrap();
        assert!(
            f.store
                .transition_offer(offer.id, OfferStatus::Pending, OfferStatus::Accepted)
                .await
                .unwrap()
                .is_none()
        );
        assert!(matches!(
            accept_offer(&f.store, &f.owner, offer.id).await,
            Err(AppError::Precondition(_))
        ));
    }

    #[tokio::test]
    async fn test_offers_visible_to_both_sides() {
        let f = fixture().await;
        let offer = propose_offer(&f.store, &f.proposer, offer_request(&f)).await.unwrap();

        for session in [&f.owner, &f.proposer] {
            let views = offers_for_user(&f.store, session).await.unwrap();
            assert_eq!(views.len(), 1);
            assert_eq!(views[0].offer.id, offer.id);
            assert_eq!(views[0].listing_title, "Website for a logo");
            assert_eq!(views[0].listing_owner_id, f.owner.user_id);
            assert_eq!(views[0].offering_skill_name, "Logo Design");
            assert_eq!(views[0].proposer_name, "Anonymous");
        }

        let stranger = Session::new(Uuid::new_v4());
        assert!(offers_for_user(&f.store, &stranger).await.unwrap().is_empty());
    }
}
