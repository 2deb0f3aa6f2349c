//! Daily calorie and macro targets.
//!
//! Sex is not collected, so the BMR uses the midpoint between the male and
//! female Mifflin-St Jeor constants. Activity is fixed at "lightly active".

use super::dto::DailyGoals;
use crate::profile::dto::{Goal, UserProfile};

const BMR_SEX_MIDPOINT: f64 = -78.0;
const LIGHTLY_ACTIVE: f64 = 1.375;

const LOSE_ADJUSTMENT: i64 = -500;
const GAIN_ADJUSTMENT: i64 = 300;

const CARBS_SHARE: f64 = 0.45;
const PROTEIN_SHARE: f64 = 0.30;
const FAT_SHARE: f64 = 0.25;

pub const KCAL_PER_G_CARBS: i64 = 4;
pub const KCAL_PER_G_PROTEIN: i64 = 4;
pub const KCAL_PER_G_FAT: i64 = 9;

pub fn bmr(profile: &UserProfile) -> f64 {
    10.0 * profile.weight + 6.25 * profile.height - 5.0 * f64::from(profile.age) + BMR_SEX_MIDPOINT
}

pub fn tdee(bmr: f64) -> f64 {
    bmr * LIGHTLY_ACTIVE
}

fn goal_adjustment(goal: Goal) -> i64 {
    match goal {
        Goal::Lose => LOSE_ADJUSTMENT,
        Goal::Gain => GAIN_ADJUSTMENT,
        Goal::Maintain => 0,
    }
}

fn grams(calories: i64, share: f64, kcal_per_gram: i64) -> i64 {
    (calories as f64 * share / kcal_per_gram as f64).round() as i64
}

/// No validation happens here: out-of-range profiles give degenerate,
/// possibly negative, targets.
pub fn calculate_goals(profile: &UserProfile) -> DailyGoals {
    let maintenance = tdee(bmr(profile)).round() as i64;
    let calories = maintenance + goal_adjustment(profile.goal);

    DailyGoals {
        daily_calorie_goal: calories,
        daily_protein_goal: grams(calories, PROTEIN_SHARE, KCAL_PER_G_PROTEIN),
        daily_carbs_goal: grams(calories, CARBS_SHARE, KCAL_PER_G_CARBS),
        daily_fat_goal: grams(calories, FAT_SHARE, KCAL_PER_G_FAT),
    }
}
