use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{error, instrument};

use super::dto::PlanResponse;
use super::repo;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/plan", get(get_plan))
}

/// GET /plan; `yogaStatus` stays "pending" until the background phase lands.
#[instrument(skip(state))]
pub async fn get_plan(
    State(state): State<AppState>,
) -> Result<Json<PlanResponse>, (StatusCode, String)> {
    match repo::load(state.store.as_ref()).await {
        Ok(Some(plan)) => Ok(Json(plan.into())),
        Ok(None) => Err((StatusCode::NOT_FOUND, "No diet plan yet".into())),
        Err(e) => {
            error!(error = %e, "get_plan failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
