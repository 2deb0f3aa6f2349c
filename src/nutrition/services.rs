use tracing::{debug, instrument};

use super::{dto::FoodAnalysis, parser::parse_nutrition};
use crate::ai::{AiClient, AiError, DataUri, RequestConfig};

/// Runs the analysis capability and attaches the numbers parsed out of its
/// free-text nutrition description.
#[instrument(skip(ai, payload, cfg), fields(mime = %payload.mime_type))]
pub async fn analyze_food(
    ai: &dyn AiClient,
    payload: &DataUri,
    cfg: &RequestConfig,
) -> Result<FoodAnalysis, AiError> {
    let out = ai.analyze_food(payload, cfg).await?;
    let nutrition = parse_nutrition(&out.nutritional_information);
    if nutrition.is_empty() {
        debug!(dish = %out.dish_name, "no nutrient figures found in analysis text");
    }
    Ok(FoodAnalysis {
        dish_name: out.dish_name,
        ingredients: out.ingredients,
        nutritional_information: out.nutritional_information,
        nutrition,
    })
}
