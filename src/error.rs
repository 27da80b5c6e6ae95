use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that can be returned from handlers
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid project ID")]
    InvalidProjectId,

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    // Store errors, `action` names the failed operation ("fetch project")
    #[error("Failed to {action}: {detail}")]
    Store {
        action: &'static str,
        detail: String,
    },

    // Upstream provider errors
    #[error("Service unavailable: {error}")]
    ServiceUnavailable {
        error: String,
        details: Option<String>,
    },

    #[error("Upstream error ({status}): {error}")]
    Upstream {
        status: StatusCode,
        error: String,
        details: Option<String>,
    },

    // Internal errors
    #[error("Internal server error")]
    Internal(String),
}

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// Status code this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidProjectId => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream { status, .. } => *status,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_message, details) = match self {
            // 400 Bad Request
            AppError::Validation(msg) => (msg, None),
            AppError::InvalidProjectId => ("Invalid project ID".to_string(), None),

            // 404 Not Found
            AppError::NotFound(resource) => (format!("{} not found", resource), None),

            // 500 Internal Server Error, detail stays in the logs
            AppError::Store { action, detail } => {
                tracing::error!(action, "Store error: {}", detail);
                (format!("Failed to {}", action), None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".to_string(), None)
            }

            // Provider errors
            AppError::ServiceUnavailable { error, details } => {
                tracing::warn!("Service unavailable: {}", error);
                (error, details)
            }
            AppError::Upstream {
                status,
                error,
                details,
            } => {
                tracing::error!(status = status.as_u16(), "Upstream error: {}", error);
                (error, details)
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
