use tracing::{error, info, instrument, warn};

use super::{dto::UserProfile, repo};
use crate::ai::RequestConfig;
use crate::logs;
use crate::plans::{
    self,
    services::{assemble_and_store, PlanError, PlanSetup},
};
use crate::state::AppState;
use crate::storage::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("invalid profile: {}", .0.join(" "))]
    Invalid(Vec<String>),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Builds the profile's plan and stores both once the meal plan is in. If the
/// meal plan cannot be generated any previous profile and plan are removed,
/// leaving the user at profile setup.
#[instrument(skip(state, profile, cfg), fields(goal = profile.goal.as_str()))]
pub async fn setup_profile(
    state: &AppState,
    profile: UserProfile,
    cfg: RequestConfig,
) -> Result<PlanSetup, ProfileError> {
    if let Err(problems) = profile.validate() {
        warn!(count = problems.len(), "profile rejected");
        return Err(ProfileError::Invalid(problems));
    }

    match assemble_and_store(state, &profile, cfg).await {
        Ok(setup) => {
            info!(plan_id = %setup.plan.plan_id, "profile set up");
            Ok(setup)
        }
        Err(e) => {
            error!(error = %e, "plan generation failed; clearing profile");
            let _guard = state.writes.lock().await;
            repo::clear(state.store.as_ref()).await?;
            plans::repo::clear(state.store.as_ref()).await?;
            Err(e.into())
        }
    }
}

/// Forgets everything: profile, plan and the food log.
#[instrument(skip(state))]
pub async fn logout(state: &AppState) -> Result<(), StoreError> {
    let _guard = state.writes.lock().await;
    repo::clear(state.store.as_ref()).await?;
    plans::repo::clear(state.store.as_ref()).await?;
    logs::repo::clear(state.store.as_ref()).await?;
    info!("session cleared");
    Ok(())
}
