mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{test_config, TestApp};

fn quality_metrics() -> Value {
    json!({
        "totalRows": 1200,
        "totalColumns": 8,
        "overall": 82.5,
        "completeness": 91.0,
        "consistency": 78.0,
        "accuracy": 85.0,
        "validity": 76.0,
        "missing": 9.0,
        "duplicates": 3.0,
        "outliers": 2.5,
        "inconsistent": 4.0,
        "columns": [
            { "name": "email", "missingPercent": 22.0, "hasInconsistencies": true }
        ]
    })
}

/// App whose insights provider is the given mock server
fn app_with_provider(provider: &MockServer) -> TestApp {
    let mut config = test_config();
    config.openai_api_key = Some("sk-test-key".to_string());
    config.openai_base_url = format!("{}/v1", provider.uri());
    TestApp::with_config(config)
}

async fn mount_provider_error(provider: &MockServer, status: u16, message: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(json!({ "error": { "message": message } })),
        )
        .mount(provider)
        .await;
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.server.get("/health").await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_root() {
    let app = TestApp::new().await;

    let response = app.server.get("/").await;

    response.assert_status(StatusCode::OK);
    response.assert_text("Portfolio API");
}

#[tokio::test]
async fn test_insights_requires_metrics() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/ai-insights")
        .json(&json!({ "sampleData": [] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "Quality metrics are required" }));
}

#[tokio::test]
async fn test_insights_without_api_key() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/ai-insights")
        .json(&json!({
            "qualityMetrics": quality_metrics(),
            "sampleData": [{ "email": "a@example.com", "age": 31 }]
        }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"], "OpenAI API key not configured");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_insights_with_placeholder_key() {
    let mut config = test_config();
    config.openai_api_key = Some("your_openai_api_key_here".to_string());
    let app = TestApp::with_config(config);

    let response = app
        .server
        .post("/api/ai-insights")
        .json(&json!({ "qualityMetrics": quality_metrics() }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_check_env_without_key() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/check-env").await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["openaiApiKey"]["exists"], false);
    assert_eq!(body["openaiApiKey"]["length"], 0);
    assert_eq!(body["insightsEnabled"], false);
}

#[tokio::test]
async fn test_check_env_never_echoes_key() {
    let mut config = test_config();
    config.openai_api_key = Some("sk-secret-value".to_string());
    let app = TestApp::with_config(config);

    let response = app.server.get("/api/check-env").await;

    response.assert_status(StatusCode::OK);
    assert!(!response.text().contains("secret"));
    let body: Value = response.json();
    assert_eq!(body["openaiApiKey"]["startsWithSk"], true);
    assert_eq!(body["insightsEnabled"], true);
}

#[tokio::test]
async fn test_insights_success() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 600,
            "temperature": 0.8
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "- Fill in missing email addresses" },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&provider)
        .await;
    let app = app_with_provider(&provider);

    let response = app
        .server
        .post("/api/ai-insights")
        .json(&json!({
            "qualityMetrics": quality_metrics(),
            "sampleData": [{ "email": null, "age": 31 }]
        }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({ "insights": "- Fill in missing email addresses" }));
}

#[tokio::test]
async fn test_insights_rate_limited() {
    let provider = MockServer::start().await;
    mount_provider_error(&provider, 429, "Rate limit reached for requests").await;
    let app = app_with_provider(&provider);

    let response = app
        .server
        .post("/api/ai-insights")
        .json(&json!({ "qualityMetrics": quality_metrics() }))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(body["error"], "Rate limit exceeded. Please try again in a moment.");
    assert_eq!(body["details"], "Rate limit reached for requests");
}

#[tokio::test]
async fn test_insights_invalid_key() {
    let provider = MockServer::start().await;
    mount_provider_error(&provider, 401, "Incorrect API key provided").await;
    let app = app_with_provider(&provider);

    let response = app
        .server
        .post("/api/ai-insights")
        .json(&json!({ "qualityMetrics": quality_metrics() }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid API key. Please check:"));
    assert_eq!(body["details"], "Incorrect API key provided");
}

#[tokio::test]
async fn test_insights_provider_unavailable() {
    let provider = MockServer::start().await;
    mount_provider_error(&provider, 503, "The engine is currently overloaded").await;
    let app = app_with_provider(&provider);

    let response = app
        .server
        .post("/api/ai-insights")
        .json(&json!({ "qualityMetrics": quality_metrics() }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "OpenAI service temporarily unavailable. Please try again later."
    );
}

#[tokio::test]
async fn test_insights_provider_unreachable() {
    // The default test base URL points at a closed port
    let mut config = test_config();
    config.openai_api_key = Some("sk-test-key".to_string());
    let app = TestApp::with_config(config);

    let response = app
        .server
        .post("/api/ai-insights")
        .json(&json!({ "qualityMetrics": quality_metrics() }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"], "Failed to reach the AI provider");
}
