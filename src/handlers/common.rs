use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use url::Url;

use crate::error::{AppError, AppResult};
use crate::models::Patch;

/// JSON body extractor whose rejections use the `{ "error": ... }` envelope.
///
/// Every rejection (bad content type, malformed JSON, wrong field type) is a 400.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}

/// Parse the `{id}` path segment
pub fn parse_project_id(raw: &str) -> AppResult<i32> {
    raw.parse::<i32>().map_err(|_| AppError::InvalidProjectId)
}

/// Require a non-blank string, returning it trimmed
pub fn validate_required(value: Option<String>, message: &str) -> AppResult<String> {
    match value.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

/// Optional URL field: null or blank becomes `None`, anything else must be an
/// absolute http(s) URL with a host
pub fn validate_optional(field: &str, value: Patch<String>) -> AppResult<Option<String>> {
    let Some(raw) = value.into_option() else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if !is_web_url(trimmed) {
        return Err(AppError::Validation(format!(
            "{} must be a valid http(s) URL",
            field
        )));
    }

    Ok(Some(trimmed.to_string()))
}

/// Technologies must be a non-empty list
pub fn validate_technologies(value: Option<Vec<String>>, message: &str) -> AppResult<Vec<String>> {
    match value {
        Some(technologies) if !technologies.is_empty() => Ok(technologies),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

fn is_web_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}
