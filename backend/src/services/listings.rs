use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::lookup::Lookup;
use crate::{
    auth::Session,
    error::{AppError, AppResult},
    models::{CreateListingRequest, ListingStatus, ListingView, NewListing, SwapListing},
    store::SwapStore,
};

/// Posts a new listing for the session user. The listing starts out active.
pub async fn create_listing(
    store: &dyn SwapStore,
    session: &Session,
    req: CreateListingRequest,
) -> AppResult<SwapListing> {
    req.validate()?;

    let offering_skill_id = req
        .offering_skill_id
        .ok_or_else(|| AppError::invalid("offering_skill_id", "Please select a skill you're offering"))?;
    let needing_skill_id = req
        .needing_skill_id
        .ok_or_else(|| AppError::invalid("needing_skill_id", "Please select a skill you need"))?;

    ensure_skills_exist(store, offering_skill_id, needing_skill_id).await?;

    let listing = store
        .insert_listing(&NewListing {
            user_id: session.user_id,
            title: req.title,
            description: req.description,
            offering_skill_id,
            needing_skill_id,
            estimated_hours: req.estimated_hours,
            delivery_time: req.delivery_time,
        })
        .await?;

    info!("User {} created listing {}", session.user_id, listing.id);
    Ok(listing)
}

/// Active listings, newest first, with owner and skill names resolved
pub async fn list_active_listings(store: &dyn SwapStore) -> AppResult<Vec<ListingView>> {
    let listings = store.active_listings().await?;

    let lookup = Lookup::load(
        store,
        listings.iter().map(|l| l.user_id),
        listings
            .iter()
            .flat_map(|l| [l.offering_skill_id, l.needing_skill_id]),
    )
    .await?;

    Ok(listings
        .into_iter()
        .map(|listing| ListingView {
            owner: lookup.profile(listing.user_id),
            owner_name: lookup.display_name(listing.user_id),
            offering_skill_name: lookup.skill_name(listing.offering_skill_id),
            needing_skill_name: lookup.skill_name(listing.needing_skill_id),
            listing,
        })
        .collect())
}

/// Narrows the board to listings matching a free-text search term
pub fn filter_listings(listings: Vec<ListingView>, term: &str) -> Vec<ListingView> {
    listings.into_iter().filter(|listing| listing.matches(term)).collect()
}

/// Takes a listing off the board. Only its owner may close it.
pub async fn close_listing(
    store: &dyn SwapStore,
    session: &Session,
    listing_id: Uuid,
) -> AppResult<SwapListing> {
    let listing = store
        .get_listing(listing_id)
        .await?
        .ok_or(AppError::NotFound("listing"))?;

    if listing.user_id != session.user_id {
        return Err(AppError::Forbidden("Only the owner can close this listing.".to_string()));
    }

    if !listing.is_active() {
        return Ok(listing);
    }

    let closed = store
        .set_listing_status(listing_id, ListingStatus::Closed)
        .await?
        .ok_or(AppError::NotFound("listing"))?;

    info!("User {} closed listing {}", session.user_id, listing_id);
    Ok(closed)
}

pub(crate) async fn ensure_skills_exist(
    store: &dyn SwapStore,
    offering_skill_id: Uuid,
    needing_skill_id: Uuid,
) -> AppResult<()> {
    let lookup = Lookup::load(store, [], [offering_skill_id, needing_skill_id]).await?;

    if !lookup.has_skill(offering_skill_id) {
        return Err(AppError::invalid("offering_skill_id", "Please select a skill you're offering"));
    }
    if !lookup.has_skill(needing_skill_id) {
        return Err(AppError::invalid("needing_skill_id", "Please select a skill you need"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::*, store::MemoryStore, models::ProfileUpdate};

    fn request(offering: Option<Uuid>, needing: Option<Uuid>) -> CreateListingRequest {
        CreateListingRequest {
            title: "Logo for landing page".to_string(),
            description: "I will build your landing page in exchange".to_string(),
            offering_skill_id: offering,
            needing_skill_id: needing,
            estimated_hours: 8,
            delivery_time: "2 weeks".to_string(),
        }
    }

    async fn seeded() -> (MemoryStore, Uuid, Uuid) {
        let store = MemoryStore::new();
        let web = store.add_skill("Web Development", None).await;
        let logo = store.add_skill("Logo Design", None).await;
        (store, web.id, logo.id)
    }

    #[tokio::test]
    async fn test_created_listing_appears_active_on_board() {
        let (store, web, logo) = seeded().await;
        let session = Session::new(Uuid::new_v4());

        let listing = create_listing(&store, &session, request(Some(web), Some(logo))).await.unwrap();
        assert_eq!(listing.status, ListingStatus::Active);

        let board = list_active_listings(&store).await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].listing.id, listing.id);
        assert_eq!(board[0].offering_skill_name, "Web Development");
        assert_eq!(board[0].needing_skill_name, "Logo Design");
    }

    #[tokio::test]
    async fn test_validation_rules() {
        let (store, web, logo) = seeded().await;
        let session = Session::new(Uuid::new_v4());

        let mut short_title = request(Some(web), Some(logo));
        short_title.title = "Logo".to_string();
        assert!(matches!(
            create_listing(&store, &session, short_title).await,
            Err(AppError::Validation { .. })
        ));

        let mut short_description = request(Some(web), Some(logo));
        short_description.description = "too short".to_string();
        assert!(create_listing(&store, &session, short_description).await.is_err());

        for hours in [MIN_SWAP_HOURS - 1, MAX_SWAP_HOURS + 1] {
            let mut bad_hours = request(Some(web), Some(logo));
            bad_hours.estimated_hours = hours;
            assert!(matches!(
                create_listing(&store, &session, bad_hours).await,
                Err(AppError::Validation { .. })
            ));
        }

        let missing_skill = create_listing(&store, &session, request(Some(web), None)).await;
        match missing_skill {
            Err(AppError::Validation { fields, .. }) => assert!(fields.contains_key("needing_skill_id")),
            other => panic!("expected validation error, got {other:?}"),
        }

        assert!(list_active_listings(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_skill_rejected() {
        let (store, web, _) = seeded().await;
        let session = Session::new(Uuid::new_v4());
        let result = create_listing(&store, &session, request(Some(web), Some(Uuid::new_v4()))).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_missing_profile_shows_anonymous() {
        let (store, web, logo) = seeded().await;
        let anonymous = Session::new(Uuid::new_v4());
        let named = Session::new(Uuid::new_v4());
        store
            .upsert_profile(named.user_id, &ProfileUpdate {
                name: "Dana".to_string(),
                bio: None,
                location: None,
                portfolio_url: None,
                avatar_url: None,
            })
            .await
            .unwrap();

        create_listing(&store, &anonymous, request(Some(web), Some(logo))).await.unwrap();
        create_listing(&store, &named, request(Some(logo), Some(web))).await.unwrap();

        let board = list_active_listings(&store).await.unwrap();
        // newest first
        assert_eq!(board[0].owner_name, "Dana");
        assert_eq!(board[1].owner_name, ANONYMOUS_DISPLAY_NAME);
        assert!(board[1].owner.is_none());
    }

    #[tokio::test]
    async fn test_search_filter_is_subset_and_case_insensitive() {
        let (store, web, logo) = seeded().await;
        let session = Session::new(Uuid::new_v4());
        create_listing(&store, &session, request(Some(web), Some(logo))).await.unwrap();

        let mut other = request(Some(logo), Some(logo));
        other.title = "Brand refresh".to_string();
        other.description = "Looking for a fresh visual identity".to_string();
        create_listing(&store, &session, other).await.unwrap();

        let all = list_active_listings(&store).await.unwrap();
        assert_eq!(filter_listings(all.clone(), "").len(), 2);

        let by_skill = filter_listings(all.clone(), "WEB develop");
        assert_eq!(by_skill.len(), 1);
        assert_eq!(by_skill[0].offering_skill_name, "Web Development");

        let by_title = filter_listings(all.clone(), "brand");
        assert_eq!(by_title.len(), 1);

        for listing in filter_listings(all.clone(), "logo") {
            assert!(all.iter().any(|l| l.listing.id == listing.listing.id));
            assert!(listing.matches("logo"));
        }

        assert!(filter_listings(all, "photography").is_empty());
    }

    #[tokio::test]
    async fn test_search_term_is_not_trimmed() {
        let (store, web, logo) = seeded().await;
        let session = Session::new(Uuid::new_v4());
        let mut websites = request(Some(web), Some(logo));
        websites.title = "Websites built".to_string();
        websites.description = "Responsive pages for small shops, delivered fast".to_string();
        create_listing(&store, &session, websites).await.unwrap();

        let all = list_active_listings(&store).await.unwrap();
        assert_eq!(filter_listings(all.clone(), "web").len(), 1);

        for term in ["   ", " web"] {
            let found = filter_listings(all.clone(), term);
            assert!(found.is_empty(), "{term:?} matched {} listings", found.len());
        }

        let spaced = filter_listings(all, "s b");
        assert_eq!(spaced.len(), 1);
        assert!(spaced[0].listing.title.to_lowercase().contains("s b"));
    }

    #[tokio::test]
    async fn test_close_listing_owner_only() {
        let (store, web, logo) = seeded().await;
        let owner = Session::new(Uuid::new_v4());
        let stranger = Session::new(Uuid::new_v4());
        let listing = create_listing(&store, &owner, request(Some(web), Some(logo))).await.unwrap();

        assert!(matches!(
            close_listing(&store, &stranger, listing.id).await,
            Err(AppError::Forbidden(_))
        ));

        let closed = close_listing(&store, &owner, listing.id).await.unwrap();
        assert_eq!(closed.status, ListingStatus::Closed);
        assert!(list_active_listings(&store).await.unwrap().is_empty());
    }
}
