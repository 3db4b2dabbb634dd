use crate::{
    error::AppResult,
    models::{SkillCategory, SkillWithCategory},
    store::SwapStore,
};

pub async fn list_skills(store: &dyn SwapStore) -> AppResult<Vec<SkillWithCategory>> {
    Ok(store.list_skills().await?)
}

pub async fn list_categories(store: &dyn SwapStore) -> AppResult<Vec<SkillCategory>> {
    Ok(store.list_categories().await?)
}
