//! Two-phase plan assembly.
//!
//! Phase 1 (meal plan) is awaited by the caller and yields a usable plan with
//! no yoga. Phase 2 (yoga) runs on its own task afterwards and only ever
//! replaces the `yoga_plan` field of the stored plan it was started for.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{DietPlan, WeeklyMealPlan, WrongLength, YogaPlan, YogaPlanState},
    goals::calculate_goals,
    repo,
};
use crate::ai::{AiClient, AiError, RequestConfig, WeeklyPlanInput, YogaPlanInput};
use crate::profile::dto::{Goal, UserProfile};
use crate::profile::repo as profile_repo;
use crate::state::AppState;
use crate::storage::StoreError;

pub const EXPERIENCE_LEVEL: &str = "beginner";

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("meal plan generation failed: {0}")]
    MealPlan(#[source] AiError),
    #[error("meal plan has the wrong shape: {0}")]
    MealPlanShape(#[source] WrongLength),
    #[error("yoga plan generation failed: {0}")]
    YogaPlan(#[source] AiError),
    #[error("yoga plan has the wrong shape: {0}")]
    YogaPlanShape(#[source] WrongLength),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyStage {
    Initial,
    MealPlanRequested,
    MealPlanReady,
    YogaRequested,
    Complete,
}

pub fn yoga_goal(goal: Goal) -> &'static str {
    match goal {
        Goal::Lose => "weight loss and flexibility",
        Goal::Gain => "strength building and muscle toning",
        Goal::Maintain => "general wellness and stress relief",
    }
}

/// Walks a single plan through both phases, tracking where it is.
pub struct PlanAssembler {
    ai: Arc<dyn AiClient>,
    cfg: RequestConfig,
    stage: AssemblyStage,
}

impl PlanAssembler {
    pub fn new(ai: Arc<dyn AiClient>, cfg: RequestConfig) -> Self {
        Self {
            ai,
            cfg,
            stage: AssemblyStage::Initial,
        }
    }

    pub fn stage(&self) -> AssemblyStage {
        self.stage
    }

    /// Phase 1. The returned plan has no yoga yet and is ready to show.
    #[instrument(skip(self, profile), fields(goal = profile.goal.as_str()))]
    pub async fn meal_plan(&mut self, profile: &UserProfile) -> Result<DietPlan, PlanError> {
        let goals = calculate_goals(profile);
        let input = WeeklyPlanInput {
            goal: profile.goal.as_str().to_string(),
            country: profile.country.clone(),
            state: profile.state.clone(),
            disorders: profile.disorders_or_none().to_string(),
            daily_calorie_goal: goals.daily_calorie_goal,
        };

        self.stage = AssemblyStage::MealPlanRequested;
        let days = self
            .ai
            .generate_weekly_plan(&input, &self.cfg)
            .await
            .map_err(PlanError::MealPlan)?;
        let weekly_plan = WeeklyMealPlan::try_from(days).map_err(PlanError::MealPlanShape)?;
        self.stage = AssemblyStage::MealPlanReady;

        debug!(calories = goals.daily_calorie_goal, "meal plan ready");
        Ok(DietPlan {
            plan_id: Uuid::new_v4(),
            goals,
            weekly_plan,
            yoga_plan: YogaPlanState::Pending,
        })
    }

    /// Phase 2 request. Does not touch any stored plan.
    #[instrument(skip(self))]
    pub async fn yoga_plan(&mut self, goal: Goal) -> Result<YogaPlan, PlanError> {
        let input = YogaPlanInput {
            goal: yoga_goal(goal).to_string(),
            experience_level: EXPERIENCE_LEVEL.to_string(),
        };

        self.stage = AssemblyStage::YogaRequested;
        let days = self
            .ai
            .generate_yoga_plan(&input, &self.cfg)
            .await
            .map_err(PlanError::YogaPlan)?;
        let yoga = YogaPlan::try_from(days).map_err(PlanError::YogaPlanShape)?;
        self.stage = AssemblyStage::Complete;
        Ok(yoga)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YogaOutcome {
    Merged,
    /// The plan was replaced or removed while yoga was generating.
    Stale,
    Failed,
}

/// Sets the yoga plan on the stored plan, if it is still the plan `plan_id`
/// names. Returns whether anything was written.
pub async fn merge_yoga_plan(
    state: &AppState,
    plan_id: Uuid,
    yoga: YogaPlan,
) -> Result<bool, PlanError> {
    let _guard = state.writes.lock().await;
    let Some(current) = repo::load(state.store.as_ref()).await? else {
        return Ok(false);
    };
    if current.plan_id != plan_id {
        return Ok(false);
    }
    repo::save(state.store.as_ref(), &current.with_yoga_plan(yoga)).await?;
    Ok(true)
}

/// Phase 2 end to end. Failures are logged and swallowed: the plan simply
/// keeps a null yoga plan.
#[instrument(skip(state, assembler))]
pub async fn complete_yoga_phase(
    state: AppState,
    mut assembler: PlanAssembler,
    plan_id: Uuid,
    goal: Goal,
) -> YogaOutcome {
    let yoga = match assembler.yoga_plan(goal).await {
        Ok(yoga) => yoga,
        Err(e) => {
            warn!(error = %e, stage = ?assembler.stage(), "yoga plan generation failed; plan stays without yoga");
            return YogaOutcome::Failed;
        }
    };
    match merge_yoga_plan(&state, plan_id, yoga).await {
        Ok(true) => {
            info!("yoga plan merged");
            YogaOutcome::Merged
        }
        Ok(false) => {
            debug!("plan changed while yoga was generating; result dropped");
            YogaOutcome::Stale
        }
        Err(e) => {
            warn!(error = %e, "could not store yoga plan");
            YogaOutcome::Failed
        }
    }
}

pub struct PlanSetup {
    pub plan: DietPlan,
    pub yoga_task: JoinHandle<YogaOutcome>,
}

/// Phase 1 awaited, then the profile and its plan stored together, then Phase 2
/// spawned. On Phase 1 failure nothing is stored and the error is returned.
pub async fn assemble_and_store(
    state: &AppState,
    profile: &UserProfile,
    cfg: RequestConfig,
) -> Result<PlanSetup, PlanError> {
    let mut assembler = PlanAssembler::new(state.ai.clone(), cfg);
    let plan = assembler.meal_plan(profile).await?;

    {
        let _guard = state.writes.lock().await;
        profile_repo::save(state.store.as_ref(), profile).await?;
        repo::save(state.store.as_ref(), &plan).await?;
    }

    let yoga_task = tokio::spawn(complete_yoga_phase(
        state.clone(),
        assembler,
        plan.plan_id,
        profile.goal,
    ));
    Ok(PlanSetup { plan, yoga_task })
}
