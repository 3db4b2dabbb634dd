use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::lookup::Lookup;
use crate::{
    auth::Session,
    constants::{PROFILE_NAME_MIN_CHARS, UNKNOWN_SKILL_NAME},
    error::{AppError, AppResult},
    models::{
        NewUserSkill, ProfileUpdate, PublicProfile, SaveUserSkillRequest, UpdateProfileRequest,
        UserProfile, UserSkill, UserSkillView,
    },
    store::SwapStore,
};

pub async fn get_own_profile(store: &dyn SwapStore, session: &Session) -> AppResult<UserProfile> {
    store
        .get_profile(session.user_id)
        .await?
        .ok_or(AppError::NotFound("profile"))
}

/// Creates the profile on first save and edits it afterwards.
pub async fn save_profile(
    store: &dyn SwapStore,
    session: &Session,
    req: UpdateProfileRequest,
) -> AppResult<UserProfile> {
    req.validate()?;

    let mut update = ProfileUpdate::from(req);
    update.name = update.name.trim().to_string();
    if update.name.chars().count() < PROFILE_NAME_MIN_CHARS {
        return Err(AppError::invalid("name", "Name must be at least 2 characters"));
    }

    let profile = store.upsert_profile(session.user_id, &update).await?;
    info!("Profile saved for {}", session.user_id);
    Ok(profile)
}

pub async fn public_profile(store: &dyn SwapStore, user_id: Uuid) -> AppResult<PublicProfile> {
    Lookup::load(store, [user_id], [])
        .await?
        .profile(user_id)
        .ok_or(AppError::NotFound("profile"))
}

/// The session user's offered and needed skills with names resolved
pub async fn list_inventory(store: &dyn SwapStore, session: &Session) -> AppResult<Vec<UserSkillView>> {
    let rows = store.list_user_skills(session.user_id).await?;
    let catalog = store.list_skills().await?;

    Ok(rows
        .into_iter()
        .map(|user_skill| {
            let skill = catalog.iter().find(|s| s.id == user_skill.skill_id);
            UserSkillView {
                skill_name: skill
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| UNKNOWN_SKILL_NAME.to_string()),
                category_name: skill.and_then(|s| s.category_name.clone()),
                user_skill,
            }
        })
        .collect())
}

pub async fn save_user_skill(
    store: &dyn SwapStore,
    session: &Session,
    req: SaveUserSkillRequest,
) -> AppResult<UserSkill> {
    req.validate()?;

    let skill_id = req
        .skill_id
        .ok_or_else(|| AppError::invalid("skill_id", "Please select a skill"))?;

    if !Lookup::load(store, [], [skill_id]).await?.has_skill(skill_id) {
        return Err(AppError::invalid("skill_id", "Please select a skill"));
    }

    let saved = store
        .upsert_user_skill(
            session.user_id,
            &NewUserSkill {
                skill_id,
                skill_type: req.skill_type,
                level: req.level,
                description: req.description,
            },
        )
        .await?;

    info!("User {} saved {:?} skill {}", session.user_id, saved.skill_type, skill_id);
    Ok(saved)
}

pub async fn remove_user_skill(store: &dyn SwapStore, session: &Session, user_skill_id: Uuid) -> AppResult<()> {
    if store.delete_user_skill(session.user_id, user_skill_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("skill"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{SkillLevel, SkillType},
        store::MemoryStore,
    };

    fn profile_request(name: &str) -> UpdateProfileRequest {
        UpdateProfileRequest {
            name: name.to_string(),
            bio: Some("Designer and part-time baker".to_string()),
            location: None,
            portfolio_url: Some("https://example.com/work".to_string()),
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn test_profile_create_then_update() {
        let store = MemoryStore::new();
        let session = Session::new(Uuid::new_v4());

        assert!(matches!(
            get_own_profile(&store, &session).await,
            Err(AppError::NotFound("profile"))
        ));

        let created = save_profile(&store, &session, profile_request("Dana")).await.unwrap();
        let updated = save_profile(&store, &session, profile_request("Dana Lee")).await.unwrap();
        assert_eq!(created.id, updated.id);
        assert_eq!(get_own_profile(&store, &session).await.unwrap().name, "Dana Lee");

        let public = public_profile(&store, session.user_id).await.unwrap();
        assert_eq!(public.name, "Dana Lee");
    }

    #[tokio::test]
    async fn test_profile_validation() {
        let store = MemoryStore::new();
        let session = Session::new(Uuid::new_v4());

        assert!(save_profile(&store, &session, profile_request("D")).await.is_err());
        assert!(save_profile(&store, &session, profile_request(" D  ")).await.is_err());

        let mut bad_url = profile_request("Dana");
        bad_url.portfolio_url = Some("not a url".to_string());
        assert!(matches!(
            save_profile(&store, &session, bad_url).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_user_skill_upsert_and_remove() {
        let store = MemoryStore::new();
        let category = store.add_category("Design").await;
        let skill = store.add_skill("Logo Design", Some(category.id)).await;
        let session = Session::new(Uuid::new_v4());

        let request = |level| SaveUserSkillRequest {
            skill_id: Some(skill.id),
            skill_type: SkillType::Offering,
            level: Some(level),
            description: None,
        };

        let first = save_user_skill(&store, &session, request(SkillLevel::Intermediate)).await.unwrap();
        let second = save_user_skill(&store, &session, request(SkillLevel::Expert)).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.user_skill_rows().await, 1);

        let inventory = list_inventory(&store, &session).await.unwrap();
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].skill_name, "Logo Design");
        assert_eq!(inventory[0].category_name.as_deref(), Some("Design"));
        assert_eq!(inventory[0].user_skill.level, Some(SkillLevel::Expert));

        let stranger = Session::new(Uuid::new_v4());
        assert!(remove_user_skill(&store, &stranger, first.id).await.is_err());
        remove_user_skill(&store, &session, first.id).await.unwrap();
        assert!(list_inventory(&store, &session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_skill_rejected() {
        let store = MemoryStore::new();
        let session = Session::new(Uuid::new_v4());
        let result = save_user_skill(
            &store,
            &session,
            SaveUserSkillRequest {
                skill_id: Some(Uuid::new_v4()),
                skill_type: SkillType::Needing,
                level: None,
                description: None,
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }
}
