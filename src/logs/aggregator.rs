use std::iter::Sum;
use std::ops::Add;

use serde::Serialize;

use super::dto::{DailyLog, Meal, MealType};
use crate::nutrition::NutritionFacts;
use crate::plans::dto::DailyGoals;

const MEALS_PER_DAY: f64 = 3.0;

/// Summed nutrition where a nutrient the parser missed counts as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NutritionTotals {
    pub calories: u64,
    pub protein: u64,
    pub carbs: u64,
    pub fat: u64,
}

impl From<&NutritionFacts> for NutritionTotals {
    fn from(facts: &NutritionFacts) -> Self {
        let n = |v: Option<u32>| u64::from(v.unwrap_or(0));
        Self {
            calories: n(facts.calories),
            protein: n(facts.protein),
            carbs: n(facts.carbs),
            fat: n(facts.fat),
        }
    }
}

impl Add for NutritionTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl Sum for NutritionTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

pub fn meal_totals(meal: &Meal) -> NutritionTotals {
    meal.items
        .iter()
        .filter_map(|item| item.analysis.as_ref())
        .map(|analysis| NutritionTotals::from(&analysis.nutrition))
        .sum()
}

pub fn day_totals(log: &DailyLog) -> NutritionTotals {
    MealType::ALL
        .into_iter()
        .map(|meal| meal_totals(log.meal(meal)))
        .sum()
}

/// `current / goal`, or 0 when there is no positive goal to measure against.
pub fn ratio(current: u64, goal: f64) -> f64 {
    if goal > 0.0 {
        current as f64 / goal
    } else {
        0.0
    }
}

/// Which slice of the daily goal a total is compared to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalShare {
    Daily,
    PerMeal,
}

impl GoalShare {
    fn of(self, daily_goal: i64) -> f64 {
        match self {
            GoalShare::Daily => daily_goal as f64,
            GoalShare::PerMeal => daily_goal as f64 / MEALS_PER_DAY,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProgressRatios {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl ProgressRatios {
    pub fn new(totals: &NutritionTotals, goals: &DailyGoals, share: GoalShare) -> Self {
        Self {
            calories: ratio(totals.calories, share.of(goals.daily_calorie_goal)),
            protein: ratio(totals.protein, share.of(goals.daily_protein_goal)),
            carbs: ratio(totals.carbs, share.of(goals.daily_carbs_goal)),
            fat: ratio(totals.fat, share.of(goals.daily_fat_goal)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealProgress {
    pub meal: MealType,
    pub item_count: usize,
    pub totals: NutritionTotals,
    pub ratios: ProgressRatios,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub date: String,
    pub goals: DailyGoals,
    pub totals: NutritionTotals,
    pub ratios: ProgressRatios,
    pub meals: Vec<MealProgress>,
}

/// Recomputed on every read; nothing here is stored.
pub fn daily_progress(log: &DailyLog, goals: &DailyGoals) -> DailyProgress {
    let meals: Vec<MealProgress> = MealType::ALL
        .into_iter()
        .map(|meal| {
            let items = log.meal(meal);
            let totals = meal_totals(items);
            MealProgress {
                meal,
                item_count: items.items.len(),
                totals,
                ratios: ProgressRatios::new(&totals, goals, GoalShare::PerMeal),
            }
        })
        .collect();
    let totals = day_totals(log);

    DailyProgress {
        date: log.date.clone(),
        goals: *goals,
        totals,
        ratios: ProgressRatios::new(&totals, goals, GoalShare::Daily),
        meals,
    }
}
