use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::FoodAnalysis;

const DATE_KEY: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// `YYYY-MM-DD`, the key under which a day's log is kept.
pub fn date_key(date: Date) -> String {
    date.format(DATE_KEY)
        .unwrap_or_else(|_| date.to_string())
}

pub fn parse_date_key(raw: &str) -> Option<Date> {
    Date::parse(raw, DATE_KEY).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

/// Append-only record of one food entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<FoodAnalysis>,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
}

impl LoggedItem {
    pub fn new(name: String, image: Option<String>, analysis: Option<FoodAnalysis>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            image,
            analysis,
            logged_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(default)]
    pub items: Vec<LoggedItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyMeals {
    #[serde(default)]
    pub breakfast: Meal,
    #[serde(default)]
    pub lunch: Meal,
    #[serde(default)]
    pub dinner: Meal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: String,
    pub meals: DailyMeals,
}

impl DailyLog {
    pub fn empty(date: Date) -> Self {
        Self {
            date: date_key(date),
            meals: DailyMeals::default(),
        }
    }

    pub fn meal(&self, meal: MealType) -> &Meal {
        match meal {
            MealType::Breakfast => &self.meals.breakfast,
            MealType::Lunch => &self.meals.lunch,
            MealType::Dinner => &self.meals.dinner,
        }
    }

    fn meal_mut(&mut self, meal: MealType) -> &mut Meal {
        match meal {
            MealType::Breakfast => &mut self.meals.breakfast,
            MealType::Lunch => &mut self.meals.lunch,
            MealType::Dinner => &mut self.meals.dinner,
        }
    }

    /// New log with `item` appended to the end of `meal`.
    pub fn with_item(mut self, meal: MealType, item: LoggedItem) -> Self {
        self.meal_mut(meal).items.push(item);
        self
    }
}

/// Every day's log by date key. Entries are only ever added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogBook(BTreeMap<String, DailyLog>);

impl LogBook {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The stored log, or an empty one that is not stored yet.
    pub fn day(&self, date: Date) -> DailyLog {
        self.0
            .get(&date_key(date))
            .cloned()
            .unwrap_or_else(|| DailyLog::empty(date))
    }

    pub fn with_item(mut self, date: Date, meal: MealType, item: LoggedItem) -> Self {
        let log = self.day(date).with_item(meal, item);
        self.0.insert(log.date.clone(), log);
        self
    }
}
