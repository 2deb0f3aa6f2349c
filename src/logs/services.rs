use bytes::Bytes;
use time::Date;
use tracing::{info, instrument, warn};

use super::dto::{LoggedItem, MealType};
use super::repo;
use crate::ai::{AiError, DataUri, RequestConfig};
use crate::nutrition::services::analyze_food;
use crate::state::AppState;
use crate::storage::StoreError;

/// What the user handed in for one meal entry.
pub enum FoodEntry {
    Photo { bytes: Bytes, content_type: String },
    Text { description: String },
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("{0}")]
    FileRead(String),
    #[error("{0}")]
    Analysis(#[source] AiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl FoodEntry {
    fn into_payload(self) -> Result<(DataUri, bool), LogError> {
        match self {
            FoodEntry::Photo { bytes, content_type } => {
                if bytes.is_empty() {
                    return Err(LogError::FileRead("The uploaded file is empty.".into()));
                }
                let uri = DataUri::from_bytes(&content_type, &bytes);
                if !uri.is_image() {
                    return Err(LogError::FileRead(format!(
                        "Expected an image, got {}.",
                        content_type
                    )));
                }
                Ok((uri, true))
            }
            FoodEntry::Text { description } => {
                if description.trim().is_empty() {
                    return Err(LogError::FileRead("Describe what you ate.".into()));
                }
                Ok((DataUri::from_description(&description), false))
            }
        }
    }
}

/// Analyses the entry and appends it to `meal` on `day`. Nothing is stored
/// unless the analysis succeeded.
#[instrument(skip(state, entry, cfg), fields(meal = meal.as_str(), %day))]
pub async fn log_food(
    state: &AppState,
    meal: MealType,
    entry: FoodEntry,
    cfg: &RequestConfig,
    day: Date,
) -> Result<LoggedItem, LogError> {
    let (payload, keep_image) = entry.into_payload()?;

    let analysis = analyze_food(state.ai.as_ref(), &payload, cfg)
        .await
        .map_err(|e| {
            warn!(error = %e, "food analysis failed");
            LogError::Analysis(e)
        })?;

    let image = keep_image.then(|| payload.to_string());
    let item = LoggedItem::new(analysis.dish_name.clone(), image, Some(analysis));

    let _guard = state.writes.lock().await;
    let book = repo::load(state.store.as_ref()).await?;
    let book = book.with_item(day, meal, item.clone());
    repo::save(state.store.as_ref(), &book).await?;

    info!(item_id = %item.id, dish = %item.name, "food logged");
    Ok(item)
}
