use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};

use super::dto::UserProfile;
use super::repo;
use super::services::{logout, setup_profile, ProfileError};
use crate::extractors::AiRequest;
use crate::plans::{dto::DailyGoals, dto::PlanResponse, goals::calculate_goals, services::{PlanError, PlanSetup}};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(put_profile).delete(delete_profile))
        .route("/goals/preview", get(preview_goals))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, (StatusCode, String)> {
    repo::load(state.store.as_ref())
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "No profile yet".into()))
}

/// PUT /profile: stores the profile and answers with the meal-plan phase
/// result. Yoga keeps generating after the response is sent.
#[instrument(skip(state, cfg, profile))]
pub async fn put_profile(
    State(state): State<AppState>,
    AiRequest(cfg): AiRequest,
    Json(profile): Json<UserProfile>,
) -> Result<(StatusCode, Json<PlanResponse>), (StatusCode, String)> {
    let PlanSetup { plan, yoga_task } = setup_profile(&state, profile, cfg)
        .await
        .map_err(profile_error)?;
    tokio::spawn(async move {
        if let Err(e) = yoga_task.await {
            error!(error = %e, "yoga phase task aborted");
        }
    });
    Ok((StatusCode::CREATED, Json(plan.into())))
}

#[instrument(skip(state))]
pub async fn delete_profile(State(state): State<AppState>) -> Result<StatusCode, (StatusCode, String)> {
    logout(&state).await.map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Targets the profile would get, without calling the AI.
#[instrument]
pub async fn preview_goals(
    Query(profile): Query<UserProfile>,
) -> Result<Json<DailyGoals>, (StatusCode, String)> {
    profile
        .validate()
        .map_err(|problems| (StatusCode::UNPROCESSABLE_ENTITY, problems.join(" ")))?;
    Ok(Json(calculate_goals(&profile)))
}

fn profile_error(e: ProfileError) -> (StatusCode, String) {
    match e {
        ProfileError::Invalid(problems) => (StatusCode::UNPROCESSABLE_ENTITY, problems.join(" ")),
        ProfileError::Plan(PlanError::Store(e)) | ProfileError::Store(e) => internal(e),
        ProfileError::Plan(e) => (
            StatusCode::BAD_GATEWAY,
            format!("Failed to generate diet plan: {e}"),
        ),
    }
}

fn internal<E: std::error::Error>(e: E) -> (StatusCode, String) {
    error!(error = %e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
