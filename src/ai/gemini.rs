use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{
    dto::{AnalyzeFoodOutput, WeeklyPlanInput, WeeklyPlanOutput, YogaPlanInput, YogaPlanOutput},
    prompts, AiClient, AiError, DataUri, RequestConfig,
};
use crate::config::AiConfig;
use crate::plans::dto::{DayMealPlan, DayYogaPlan};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Google Generative Language API (`generateContent`) with JSON output.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    default_key: Option<String>,
}

impl GeminiClient {
    pub fn new(cfg: &AiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            default_key: cfg.api_key.clone(),
        })
    }

    fn resolve_key<'a>(&'a self, cfg: &'a RequestConfig) -> Result<&'a str, AiError> {
        cfg.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .or(self.default_key.as_deref())
            .ok_or(AiError::MissingCredential)
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate<T: DeserializeOwned>(
        &self,
        parts: Vec<Part>,
        cfg: &RequestConfig,
    ) -> Result<T, AiError> {
        let key = self.resolve_key(cfg)?;
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GenerateResponse>(&raw)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or(raw);
            error!(%status, %message, "gemini error response");
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = extract_text(serde_json::from_str(&raw)?)?;
        debug!(bytes = text.len(), "gemini response received");
        Ok(serde_json::from_str(strip_code_fence(&text))?)
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, AiError> {
    if let Some(err) = response.error {
        return Err(AiError::Api {
            status: 200,
            message: err.message,
        });
    }
    let text: String = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(text)
}

/// Models occasionally wrap JSON in a ```json fence despite the mime type.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[async_trait]
impl AiClient for GeminiClient {
    #[instrument(skip(self, payload, cfg), fields(mime = %payload.mime_type))]
    async fn analyze_food(
        &self,
        payload: &DataUri,
        cfg: &RequestConfig,
    ) -> Result<AnalyzeFoodOutput, AiError> {
        let parts = vec![
            Part::Text {
                text: prompts::analyze_food(),
            },
            Part::Inline {
                inline_data: InlineData {
                    mime_type: payload.mime_type.clone(),
                    data: payload.data.clone(),
                },
            },
        ];
        self.generate(parts, cfg).await
    }

    #[instrument(skip(self, input, cfg), fields(goal = %input.goal))]
    async fn generate_weekly_plan(
        &self,
        input: &WeeklyPlanInput,
        cfg: &RequestConfig,
    ) -> Result<Vec<DayMealPlan>, AiError> {
        let parts = vec![Part::Text {
            text: prompts::weekly_plan(input),
        }];
        let out: WeeklyPlanOutput = self.generate(parts, cfg).await?;
        Ok(out.weekly_plan)
    }

    #[instrument(skip(self, input, cfg), fields(goal = %input.goal))]
    async fn generate_yoga_plan(
        &self,
        input: &YogaPlanInput,
        cfg: &RequestConfig,
    ) -> Result<Vec<DayYogaPlan>, AiError> {
        let parts = vec![Part::Text {
            text: prompts::yoga_plan(input),
        }];
        let out: YogaPlanOutput = self.generate(parts, cfg).await?;
        Ok(out.yoga_plan)
    }
}
