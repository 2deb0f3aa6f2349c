use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use time::{Date, OffsetDateTime};
use tracing::{error, instrument};

use super::aggregator::{daily_progress, DailyProgress};
use super::dto::{parse_date_key, DailyLog, LoggedItem, MealType};
use super::repo;
use super::services::{log_food, FoodEntry, LogError};
use crate::extractors::AiRequest;
use crate::plans;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/logs", get(get_log))
        .route("/progress", get(get_progress))
}

pub fn write_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/logs/:meal/photo", post(log_photo))
        .route("/logs/:meal/text", post(log_text))
        .layer(DefaultBodyLimit::max(upload_limit))
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

impl DayQuery {
    /// The requested day, today (UTC) when absent.
    fn day(&self) -> Result<Date, (StatusCode, String)> {
        match self.date.as_deref() {
            None => Ok(today()),
            Some(raw) => parse_date_key(raw).ok_or((
                StatusCode::BAD_REQUEST,
                format!("date must be YYYY-MM-DD, got {raw:?}"),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TextEntry {
    pub description: String,
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// POST /logs/:meal/photo (multipart, field `file`)
#[instrument(skip(state, cfg, mp))]
pub async fn log_photo(
    State(state): State<AppState>,
    Path(meal): Path<MealType>,
    AiRequest(cfg): AiRequest,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<LoggedItem>), (StatusCode, String)> {
    let mut entry = None;
    while let Some(field) = mp.next_field().await.map_err(file_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let bytes = field.bytes().await.map_err(file_error)?;
        entry = Some(FoodEntry::Photo { bytes, content_type });
        break;
    }
    let entry = entry.ok_or((
        StatusCode::BAD_REQUEST,
        format!("File Error: multipart field `{UPLOAD_FIELD}` is required"),
    ))?;

    let item = log_food(&state, meal, entry, &cfg, today())
        .await
        .map_err(log_error)?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// POST /logs/:meal/text { description }
#[instrument(skip(state, cfg, body))]
pub async fn log_text(
    State(state): State<AppState>,
    Path(meal): Path<MealType>,
    AiRequest(cfg): AiRequest,
    Json(body): Json<TextEntry>,
) -> Result<(StatusCode, Json<LoggedItem>), (StatusCode, String)> {
    let entry = FoodEntry::Text {
        description: body.description,
    };
    let item = log_food(&state, meal, entry, &cfg, today())
        .await
        .map_err(log_error)?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state))]
pub async fn get_log(
    State(state): State<AppState>,
    Query(q): Query<DayQuery>,
) -> Result<Json<DailyLog>, (StatusCode, String)> {
    let day = q.day()?;
    let book = repo::load(state.store.as_ref()).await.map_err(internal)?;
    Ok(Json(book.day(day)))
}

#[instrument(skip(state))]
pub async fn get_progress(
    State(state): State<AppState>,
    Query(q): Query<DayQuery>,
) -> Result<Json<DailyProgress>, (StatusCode, String)> {
    let day = q.day()?;
    let plan = plans::repo::load(state.store.as_ref())
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "No diet plan yet".into()))?;
    let book = repo::load(state.store.as_ref()).await.map_err(internal)?;
    Ok(Json(daily_progress(&book.day(day), &plan.goals)))
}

fn log_error(e: LogError) -> (StatusCode, String) {
    match e {
        LogError::FileRead(msg) => (StatusCode::BAD_REQUEST, format!("File Error: {msg}")),
        LogError::Analysis(e) => (StatusCode::BAD_GATEWAY, format!("Analysis Failed: {e}")),
        LogError::Store(e) => internal(e),
    }
}

fn file_error<E: std::error::Error>(e: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, format!("File Error: {e}"))
}

fn internal<E: std::error::Error>(e: E) -> (StatusCode, String) {
    error!(error = %e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
