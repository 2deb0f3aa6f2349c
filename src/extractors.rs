use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::ai::RequestConfig;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Per-request AI settings. A non-blank `x-api-key` header overrides the
/// server's default key; no header is fine.
pub struct AiRequest(pub RequestConfig);

#[async_trait]
impl<S> FromRequestParts<S> for AiRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let cfg = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(RequestConfig::with_api_key)
            .unwrap_or_default();

        Ok(AiRequest(cfg))
    }
}
