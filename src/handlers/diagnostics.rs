use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::insights::PLACEHOLDER_API_KEY;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
}

/// What is known about the configured key. Never carries the key itself.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyStatus {
    pub exists: bool,
    pub is_placeholder: bool,
    pub is_empty: bool,
    pub starts_with_sk: bool,
    pub length: usize,
}

impl ApiKeyStatus {
    pub fn inspect(raw: Option<&str>) -> Self {
        Self {
            exists: raw.is_some(),
            is_placeholder: raw == Some(PLACEHOLDER_API_KEY),
            is_empty: raw.map_or(true, |key| key.trim().is_empty()),
            starts_with_sk: raw.is_some_and(|key| key.starts_with("sk-")),
            length: raw.map_or(0, str::len),
        }
    }

    pub fn recommendation(&self) -> &'static str {
        if !self.exists || self.is_empty {
            "No API key found. Set OPENAI_API_KEY in the environment or .env file"
        } else if self.is_placeholder {
            "API key is still the placeholder. Replace it with your actual key"
        } else if !self.starts_with_sk {
            "API key exists but doesn't start with 'sk-'. Check if it's valid"
        } else {
            "API key appears to be configured correctly"
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvCheckResponse {
    pub status: String,
    pub openai_api_key: ApiKeyStatus,
    pub insights_enabled: bool,
    pub recommendation: String,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Report whether the LLM provider key is configured
#[utoipa::path(
    get,
    path = "/api/check-env",
    responses(
        (status = 200, description = "Environment check", body = EnvCheckResponse)
    ),
    tag = "Health"
)]
pub async fn check_env(State(state): State<AppState>) -> Json<EnvCheckResponse> {
    let key = ApiKeyStatus::inspect(state.config.openai_api_key.as_deref());
    let recommendation = key.recommendation().to_string();

    Json(EnvCheckResponse {
        status: "Environment Check".to_string(),
        openai_api_key: key,
        insights_enabled: state.insights.is_configured(),
        recommendation,
    })
}
