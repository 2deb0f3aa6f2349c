use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DAYS_IN_PLAN: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyGoals {
    pub daily_calorie_goal: i64,
    pub daily_protein_goal: i64,
    pub daily_carbs_goal: i64,
    pub daily_fat_goal: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSuggestions {
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMealPlan {
    pub day: String,
    pub meals: MealSuggestions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asana {
    pub name: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meditation {
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayYogaPlan {
    pub day: String,
    pub focus: String,
    pub asanas: Vec<Asana>,
    pub meditation: Meditation,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("expected a {expected}-day plan, got {actual} days")]
pub struct WrongLength {
    pub expected: usize,
    pub actual: usize,
}

fn check_week<T>(days: &[T]) -> Result<(), WrongLength> {
    if days.len() == DAYS_IN_PLAN {
        Ok(())
    } else {
        Err(WrongLength {
            expected: DAYS_IN_PLAN,
            actual: days.len(),
        })
    }
}

/// Exactly seven days of meal suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DayMealPlan>", into = "Vec<DayMealPlan>")]
pub struct WeeklyMealPlan(Vec<DayMealPlan>);

impl WeeklyMealPlan {
    #[cfg(test)]
    pub fn days(&self) -> &[DayMealPlan] {
        &self.0
    }
}

impl TryFrom<Vec<DayMealPlan>> for WeeklyMealPlan {
    type Error = WrongLength;

    fn try_from(days: Vec<DayMealPlan>) -> Result<Self, Self::Error> {
        check_week(&days)?;
        Ok(Self(days))
    }
}

impl From<WeeklyMealPlan> for Vec<DayMealPlan> {
    fn from(plan: WeeklyMealPlan) -> Self {
        plan.0
    }
}

/// Exactly seven days of yoga and meditation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DayYogaPlan>", into = "Vec<DayYogaPlan>")]
pub struct YogaPlan(Vec<DayYogaPlan>);

impl YogaPlan {
    #[cfg(test)]
    pub fn days(&self) -> &[DayYogaPlan] {
        &self.0
    }
}

impl TryFrom<Vec<DayYogaPlan>> for YogaPlan {
    type Error = WrongLength;

    fn try_from(days: Vec<DayYogaPlan>) -> Result<Self, Self::Error> {
        check_week(&days)?;
        Ok(Self(days))
    }
}

impl From<YogaPlan> for Vec<DayYogaPlan> {
    fn from(plan: YogaPlan) -> Self {
        plan.0
    }
}

/// Where the background yoga generation stands.
///
/// On the wire this collapses to `null | [7 days]`; a stored `null` comes back
/// as `Pending` because a failed generation is indistinguishable from one
/// still running.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<YogaPlan>", into = "Option<YogaPlan>")]
pub enum YogaPlanState {
    #[default]
    NotStarted,
    Pending,
    Ready(YogaPlan),
}

impl YogaPlanState {
    #[cfg(test)]
    pub fn ready(&self) -> Option<&YogaPlan> {
        match self {
            YogaPlanState::Ready(plan) => Some(plan),
            _ => None,
        }
    }
}

impl From<Option<YogaPlan>> for YogaPlanState {
    fn from(plan: Option<YogaPlan>) -> Self {
        match plan {
            Some(plan) => YogaPlanState::Ready(plan),
            None => YogaPlanState::Pending,
        }
    }
}

impl From<YogaPlanState> for Option<YogaPlan> {
    fn from(state: YogaPlanState) -> Self {
        match state {
            YogaPlanState::Ready(plan) => Some(plan),
            YogaPlanState::NotStarted | YogaPlanState::Pending => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YogaStatus {
    Pending,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    /// Identifies the setup run that produced this plan.
    #[serde(default)]
    pub plan_id: Uuid,
    #[serde(flatten)]
    pub goals: DailyGoals,
    pub weekly_plan: WeeklyMealPlan,
    #[serde(default)]
    pub yoga_plan: YogaPlanState,
}

impl DietPlan {
    pub fn yoga_status(&self) -> YogaStatus {
        match self.yoga_plan {
            YogaPlanState::Ready(_) => YogaStatus::Ready,
            YogaPlanState::NotStarted | YogaPlanState::Pending => YogaStatus::Pending,
        }
    }

    #[cfg(test)]
    pub fn is_complete(&self) -> bool {
        self.yoga_status() == YogaStatus::Ready
    }

    /// Only the yoga field changes; everything from the meal-plan phase stays.
    pub fn with_yoga_plan(self, yoga: YogaPlan) -> Self {
        Self {
            yoga_plan: YogaPlanState::Ready(yoga),
            ..self
        }
    }
}

/// Plan view returned to the client: the plan plus whether yoga is ready.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    #[serde(flatten)]
    pub plan: DietPlan,
    pub yoga_status: YogaStatus,
}

impl From<DietPlan> for PlanResponse {
    fn from(plan: DietPlan) -> Self {
        let yoga_status = plan.yoga_status();
        Self { plan, yoga_status }
    }
}

#[cfg(test)]
pub(crate) fn sample_week() -> Vec<DayMealPlan> {
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]
        .iter()
        .map(|day| DayMealPlan {
            day: day.to_string(),
            meals: MealSuggestions {
                breakfast: "Idli with sambar".into(),
                lunch: "Rice, dal and thoran".into(),
                dinner: "Chapati with vegetable stew".into(),
            },
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_yoga_week() -> Vec<DayYogaPlan> {
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]
        .iter()
        .map(|day| DayYogaPlan {
            day: day.to_string(),
            focus: "Flexibility".into(),
            asanas: vec![
                Asana {
                    name: "Tadasana".into(),
                    duration: "1 minute".into(),
                },
                Asana {
                    name: "Balasana".into(),
                    duration: "2 minutes".into(),
                },
            ],
            meditation: Meditation {
                kind: "Breath Awareness".into(),
                duration: "10 minutes".into(),
            },
        })
        .collect()
}
