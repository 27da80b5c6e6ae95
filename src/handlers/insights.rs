use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::common::JsonBody;
use crate::services::QualityMetrics;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRequest {
    pub quality_metrics: Option<QualityMetrics>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub sample_data: Option<Vec<Map<String, Value>>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InsightsResponse {
    pub insights: String,
}

// ============ Handlers ============

/// Generate data-quality recommendations with the configured LLM provider
#[utoipa::path(
    post,
    path = "/api/ai-insights",
    request_body = InsightsRequest,
    responses(
        (status = 200, description = "Generated recommendations", body = InsightsResponse),
        (status = 400, description = "Quality metrics are required"),
        (status = 401, description = "Provider rejected the API key"),
        (status = 429, description = "Provider rate limit exceeded"),
        (status = 502, description = "Provider unreachable"),
        (status = 503, description = "API key not configured")
    ),
    tag = "Insights"
)]
pub async fn generate_insights(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<InsightsRequest>,
) -> AppResult<Json<InsightsResponse>> {
    let metrics = payload
        .quality_metrics
        .ok_or_else(|| AppError::Validation("Quality metrics are required".to_string()))?;

    let insights = state
        .insights
        .generate(&metrics, payload.sample_data.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(InsightsResponse { insights }))
}
