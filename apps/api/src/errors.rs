use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing credential. Rejected before any outbound call; recoverable by
    /// fixing the environment.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Bad request input (empty topic, out-of-range word bound). Rejected
    /// before any outbound call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Terminal caption-generation failure, surfaced with its detail so the
    /// caller can act on the remediation text.
    #[error("Caption generation failed: {0}")]
    Caption(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Configuration(msg) => {
                (StatusCode::BAD_REQUEST, "CONFIGURATION_ERROR", msg.clone())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Caption(e) => {
                tracing::error!("Caption generation error: {e}");
                (StatusCode::BAD_GATEWAY, "CAPTION_ERROR", self.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_error_keeps_detail_for_the_caller() {
        let err = AppError::Caption(LlmError::ModelsExhausted {
            detail: "'gemini-1.5-flash': not found".to_string(),
        });
        let msg = err.to_string();
        assert!(msg.starts_with("Caption generation failed"));
        assert!(msg.contains("gemini-1.5-flash"));
    }

    #[test]
    fn test_configuration_error_is_tagged() {
        let err = AppError::Configuration("GEMINI_API_KEY is not set".to_string());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
