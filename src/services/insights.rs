use axum::http::StatusCode;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use utoipa::ToSchema;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Value shipped in sample `.env` files; treated as "not configured"
pub const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

const MAX_TOKENS: u32 = 600;
const TEMPERATURE: f32 = 0.8;
const SAMPLE_ROWS: usize = 3;
const SAMPLE_COLUMNS: usize = 5;

const SYSTEM_PROMPT: &str = "You are a data quality expert. Provide clear, actionable insights \
about data quality issues in plain language that non-technical users can understand. Format \
your response as a bulleted list of recommendations, with each recommendation on a new line \
starting with '- '. Be specific and actionable.";

const INVALID_KEY_HELP: &str = "Invalid API key. Please check:
1. Your API key is complete (not cut off)
2. No extra spaces or quotes around the key
3. The key is active in your OpenAI account
4. Your OpenAI account has billing set up";

/// Data-quality summary produced by the client-side profiler
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityMetrics {
    pub total_rows: f64,
    pub total_columns: f64,
    pub overall: f64,
    pub completeness: f64,
    pub consistency: f64,
    pub accuracy: f64,
    pub validity: f64,
    pub missing: f64,
    pub duplicates: f64,
    pub outliers: f64,
    pub inconsistent: f64,
    pub columns: Option<Vec<ColumnMetrics>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnMetrics {
    pub name: String,
    pub missing_percent: f64,
    pub has_inconsistencies: bool,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Turns quality metrics into recommendations through an OpenAI-compatible API
#[derive(Clone)]
pub struct InsightsService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl InsightsService {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.openai_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.openai_api_key.as_deref().and_then(sanitize_api_key),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask the provider for recommendations
    pub async fn generate(
        &self,
        metrics: &QualityMetrics,
        sample_data: &[Map<String, Value>],
    ) -> AppResult<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::ServiceUnavailable {
                error: "OpenAI API key not configured".to_string(),
                details: Some(
                    "Set OPENAI_API_KEY in the environment or .env file and restart the server"
                        .to_string(),
                ),
            }
        })?;

        let prompt = build_prompt(metrics, sample_data);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        tracing::info!(model = %self.model, "Requesting AI insights");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("AI provider request failed: {}", e);
                AppError::Upstream {
                    status: StatusCode::BAD_GATEWAY,
                    error: "Failed to reach the AI provider".to_string(),
                    details: None,
                }
            })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let original = body["error"]["message"]
                .as_str()
                .unwrap_or("Failed to generate AI insights")
                .to_string();
            return Err(upstream_error(status, original));
        }

        let body: ChatResponse = response.json().await.map_err(|e| AppError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            error: "AI provider returned an unreadable response".to_string(),
            details: Some(e.to_string()),
        })?;

        let insights = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                error: "AI provider returned no insights".to_string(),
                details: None,
            })?;

        tracing::info!("AI insights generated");
        Ok(insights)
    }
}

/// Strip whitespace and surrounding quotes; reject blank or placeholder keys
pub fn sanitize_api_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let key = trimmed
        .strip_prefix(['"', '\''])
        .unwrap_or(trimmed);
    let key = key.strip_suffix(['"', '\'']).unwrap_or(key).trim();

    if key.is_empty() || key == PLACEHOLDER_API_KEY {
        None
    } else {
        Some(key.to_string())
    }
}

fn upstream_error(status: StatusCode, original: String) -> AppError {
    let error = match status {
        StatusCode::UNAUTHORIZED => INVALID_KEY_HELP,
        StatusCode::TOO_MANY_REQUESTS => "Rate limit exceeded. Please try again in a moment.",
        StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => {
            "OpenAI service temporarily unavailable. Please try again later."
        }
        _ => "Failed to generate AI insights",
    };

    AppError::Upstream {
        status,
        error: error.to_string(),
        details: Some(original),
    }
}

/// Build the user prompt describing the dataset's quality
pub fn build_prompt(metrics: &QualityMetrics, sample_data: &[Map<String, Value>]) -> String {
    let mut issues = Vec::new();
    if metrics.missing > 5.0 {
        issues.push(format!(
            "{}% of data cells are missing values.",
            metrics.missing
        ));
    }
    if metrics.duplicates > 0.0 {
        issues.push(format!("{}% of rows are duplicates.", metrics.duplicates));
    }
    if metrics.outliers > 0.0 {
        issues.push(format!(
            "Outliers detected in {}% of numeric data.",
            metrics.outliers
        ));
    }
    if metrics.inconsistent > 0.0 {
        issues.push(format!(
            "{}% of columns have inconsistent data types.",
            metrics.inconsistent
        ));
    }

    let issues = if issues.is_empty() {
        "- No major issues detected".to_string()
    } else {
        issues
            .iter()
            .map(|issue| format!("- {}", issue))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let column_issues = metrics
        .columns
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter(|col| col.missing_percent > 10.0 || col.has_inconsistencies)
        .map(|col| {
            let mut problems = Vec::new();
            if col.missing_percent > 10.0 {
                problems.push(format!("{}% missing values", col.missing_percent));
            }
            if col.has_inconsistencies {
                problems.push("inconsistent data types".to_string());
            }
            format!("- {}: {}", col.name, problems.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n");

    let column_issues = if column_issues.is_empty() {
        "No major column-specific issues detected.".to_string()
    } else {
        column_issues
    };

    let sample_section = sample_summary(sample_data)
        .map(|json| format!("SAMPLE DATA (first 3 rows):\n```json\n{}\n```", json))
        .unwrap_or_default();

    format!(
        "You are analyzing a dataset quality report. Provide specific, actionable recommendations.

DATASET OVERVIEW:
- Total Rows: {total_rows}
- Total Columns: {total_columns}
- Overall Quality Score: {overall}%

QUALITY METRICS:
- Completeness: {completeness}% (higher is better)
- Consistency: {consistency}% (higher is better)
- Accuracy: {accuracy}% (higher is better)
- Validity: {validity}% (higher is better)

ISSUES DETECTED:
{issues}

COLUMN-SPECIFIC ISSUES:
{column_issues}

{sample_section}

INSTRUCTIONS:
1. Analyze the quality score and metrics above
2. Identify the most critical issues affecting data quality
3. Provide 4-6 specific, actionable recommendations
4. Format each recommendation as a bullet point starting with \"- \"
5. Be specific about which columns or data patterns need attention
6. Use simple, non-technical language
7. Make recommendations practical and implementable

Your response should be ONLY the bulleted list of recommendations, nothing else.",
        total_rows = metrics.total_rows,
        total_columns = metrics.total_columns,
        overall = metrics.overall,
        completeness = metrics.completeness,
        consistency = metrics.consistency,
        accuracy = metrics.accuracy,
        validity = metrics.validity,
    )
}

/// First rows, first columns of each, pretty-printed
fn sample_summary(sample_data: &[Map<String, Value>]) -> Option<String> {
    if sample_data.is_empty() {
        return None;
    }

    let rows: Vec<Map<String, Value>> = sample_data
        .iter()
        .take(SAMPLE_ROWS)
        .map(|row| {
            row.iter()
                .take(SAMPLE_COLUMNS)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .collect();

    serde_json::to_string_pretty(&rows).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metrics() -> QualityMetrics {
        serde_json::from_value(json!({
            "totalRows": 1200,
            "totalColumns": 8,
            "overall": 72.5,
            "completeness": 88,
            "consistency": 70,
            "accuracy": 65,
            "validity": 67,
            "missing": 12,
            "duplicates": 0,
            "outliers": 3,
            "inconsistent": 0,
            "columns": [
                { "name": "email", "missingPercent": 25, "hasInconsistencies": false },
                { "name": "age", "missingPercent": 2, "hasInconsistencies": true },
                { "name": "city", "missingPercent": 1, "hasInconsistencies": false }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_sanitize_api_key() {
        assert_eq!(sanitize_api_key("  sk-abc  ").as_deref(), Some("sk-abc"));
        assert_eq!(sanitize_api_key("\"sk-abc\"").as_deref(), Some("sk-abc"));
        assert_eq!(sanitize_api_key("'sk-abc'").as_deref(), Some("sk-abc"));
        assert_eq!(sanitize_api_key("   "), None);
        assert_eq!(sanitize_api_key(PLACEHOLDER_API_KEY), None);
    }

    #[test]
    fn test_build_prompt_lists_issues() {
        let prompt = build_prompt(&metrics(), &[]);

        assert!(prompt.contains("- Total Rows: 1200"));
        assert!(prompt.contains("- Overall Quality Score: 72.5%"));
        assert!(prompt.contains("- 12% of data cells are missing values."));
        assert!(prompt.contains("- Outliers detected in 3% of numeric data."));
        assert!(!prompt.contains("duplicates"));
        assert!(prompt.contains("- email: 25% missing values"));
        assert!(prompt.contains("- age: inconsistent data types"));
        assert!(!prompt.contains("- city"));
        assert!(!prompt.contains("SAMPLE DATA"));
    }

    #[test]
    fn test_build_prompt_without_issues() {
        let prompt = build_prompt(&QualityMetrics::default(), &[]);

        assert!(prompt.contains("- No major issues detected"));
        assert!(prompt.contains("No major column-specific issues detected."));
    }

    #[test]
    fn test_sample_is_limited_to_three_rows_and_five_columns() {
        let row = json!({ "a": 1, "b": 2, "c": 3, "d": 4, "e": 5, "f": 6 });
        let rows: Vec<Map<String, Value>> = (0..5)
            .map(|_| row.as_object().unwrap().clone())
            .collect();

        let summary = sample_summary(&rows).unwrap();
        let parsed: Vec<Map<String, Value>> = serde_json::from_str(&summary).unwrap();

        assert_eq!(parsed.len(), 3);
        assert_eq!(
            parsed[0].keys().cloned().collect::<Vec<_>>(),
            vec!["a", "b", "c", "d", "e"]
        );

        let prompt = build_prompt(&QualityMetrics::default(), &rows);
        assert!(prompt.contains("SAMPLE DATA (first 3 rows):\n```json\n["));
    }

    #[test]
    fn test_upstream_error_messages() {
        match upstream_error(StatusCode::TOO_MANY_REQUESTS, "slow down".to_string()) {
            AppError::Upstream {
                status,
                error,
                details,
            } => {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
                assert!(error.starts_with("Rate limit exceeded"));
                assert_eq!(details.as_deref(), Some("slow down"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
