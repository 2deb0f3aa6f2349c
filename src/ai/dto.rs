use serde::{Deserialize, Serialize};

use crate::plans::dto::{DayMealPlan, DayYogaPlan};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeFoodOutput {
    pub dish_name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub nutritional_information: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlanInput {
    pub goal: String,
    pub country: String,
    pub state: String,
    pub disorders: String,
    pub daily_calorie_goal: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YogaPlanInput {
    pub goal: String,
    pub experience_level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WeeklyPlanOutput {
    pub weekly_plan: Vec<DayMealPlan>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct YogaPlanOutput {
    pub yoga_plan: Vec<DayYogaPlan>,
}
