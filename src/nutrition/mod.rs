pub mod dto;
pub mod parser;
pub mod services;

pub use dto::{FoodAnalysis, NutritionFacts};
