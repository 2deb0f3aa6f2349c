use super::dto::LogBook;
use crate::storage::{get_json, set_json, KeyValueStore, StoreError, FOOD_LOG_KEY};

pub async fn load(store: &dyn KeyValueStore) -> Result<LogBook, StoreError> {
    Ok(get_json(store, FOOD_LOG_KEY).await?.unwrap_or_default())
}

pub async fn save(store: &dyn KeyValueStore, book: &LogBook) -> Result<(), StoreError> {
    set_json(store, FOOD_LOG_KEY, book).await
}

pub async fn clear(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.remove(FOOD_LOG_KEY).await?;
    Ok(())
}
