use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

use crate::{
    constants::{ANONYMOUS_DISPLAY_NAME, UNKNOWN_SKILL_NAME},
    error::AppResult,
    models::{PublicProfile, Skill},
    store::SwapStore,
};

/// Batch-resolved profiles and skill names used to build read models.
///
/// Each projection issues one lookup per table keyed on the distinct ids it
/// references, instead of joining row by row.
#[derive(Debug, Default)]
pub(crate) struct Lookup {
    profiles: HashMap<Uuid, PublicProfile>,
    skills: HashMap<Uuid, Skill>,
}

impl Lookup {
    pub(crate) async fn load(
        store: &dyn SwapStore,
        user_ids: impl IntoIterator<Item = Uuid>,
        skill_ids: impl IntoIterator<Item = Uuid>,
    ) -> AppResult<Self> {
        let user_ids: Vec<Uuid> = user_ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        let skill_ids: Vec<Uuid> = skill_ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();

        let profiles = if user_ids.is_empty() {
            Vec::new()
        } else {
            store.profiles_by_user_ids(&user_ids).await?
        };
        let skills = if skill_ids.is_empty() {
            Vec::new()
        } else {
            store.skills_by_ids(&skill_ids).await?
        };

        Ok(Self {
            profiles: profiles.into_iter().map(|p| (p.user_id, p)).collect(),
            skills: skills.into_iter().map(|s| (s.id, s)).collect(),
        })
    }

    pub(crate) fn profile(&self, user_id: Uuid) -> Option<PublicProfile> {
        self.profiles.get(&user_id).cloned()
    }

    pub(crate) fn display_name(&self, user_id: Uuid) -> String {
        self.profiles
            .get(&user_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| ANONYMOUS_DISPLAY_NAME.to_string())
    }

    pub(crate) fn skill_name(&self, skill_id: Uuid) -> String {
        self.skills
            .get(&skill_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| UNKNOWN_SKILL_NAME.to_string())
    }

    pub(crate) fn has_skill(&self, skill_id: Uuid) -> bool {
        self.skills.contains_key(&skill_id)
    }
}
