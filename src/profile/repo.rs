use super::dto::UserProfile;
use crate::storage::{get_json, set_json, KeyValueStore, StoreError, PROFILE_KEY};

pub async fn load(store: &dyn KeyValueStore) -> Result<Option<UserProfile>, StoreError> {
    get_json(store, PROFILE_KEY).await
}

pub async fn save(store: &dyn KeyValueStore, profile: &UserProfile) -> Result<(), StoreError> {
    set_json(store, PROFILE_KEY, profile).await
}

pub async fn clear(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.remove(PROFILE_KEY).await?;
    Ok(())
}
