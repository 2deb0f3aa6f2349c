use super::dto::DietPlan;
use crate::storage::{get_json, set_json, KeyValueStore, StoreError, PLAN_KEY};

pub async fn load(store: &dyn KeyValueStore) -> Result<Option<DietPlan>, StoreError> {
    get_json(store, PLAN_KEY).await
}

pub async fn save(store: &dyn KeyValueStore, plan: &DietPlan) -> Result<(), StoreError> {
    set_json(store, PLAN_KEY, plan).await
}

pub async fn clear(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.remove(PLAN_KEY).await?;
    Ok(())
}
