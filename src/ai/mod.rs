//! The three AI capabilities the app depends on, behind one trait.

pub mod dto;
#[cfg(test)]
pub mod fake;
pub mod gemini;
pub mod payload;
mod prompts;

use async_trait::async_trait;

pub use dto::{AnalyzeFoodOutput, WeeklyPlanInput, YogaPlanInput};
pub use gemini::GeminiClient;
pub use payload::DataUri;

use crate::plans::dto::{DayMealPlan, DayYogaPlan};

/// Per-request settings threaded through every AI call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestConfig {
    /// User supplied key; wins over the server default when present.
    pub api_key: Option<String>,
}

impl RequestConfig {
    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("no API key configured and none supplied with the request")]
    MissingCredential,
    #[error("AI request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("AI service returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("AI service returned no content")]
    EmptyResponse,
    #[error("AI output did not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait AiClient: Send + Sync {
    async fn analyze_food(
        &self,
        payload: &DataUri,
        cfg: &RequestConfig,
    ) -> Result<AnalyzeFoodOutput, AiError>;

    async fn generate_weekly_plan(
        &self,
        input: &WeeklyPlanInput,
        cfg: &RequestConfig,
    ) -> Result<Vec<DayMealPlan>, AiError>;

    async fn generate_yoga_plan(
        &self,
        input: &YogaPlanInput,
        cfg: &RequestConfig,
    ) -> Result<Vec<DayYogaPlan>, AiError>;
}
