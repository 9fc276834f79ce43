use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// User-facing message for every failure of the outbound AI call.
pub const AI_REQUEST_FAILED: &str = "AI request failed";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Extraction failures are deliberately absent: they are rendered, not returned.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request body could not be decoded. Reported like an AI failure,
    /// matching the single `{ error }` contract of the analyze endpoint.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Page rendering failed.
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message safe to show to the user. Internal details only go to the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::MalformedRequest(_) | AppError::Llm(_) => AI_REQUEST_FAILED.to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Emits the log line for this error. Called once, at the response boundary.
    pub fn log(&self) {
        match self {
            AppError::Validation(msg) => tracing::debug!("Validation error: {msg}"),
            AppError::MalformedRequest(msg) => tracing::warn!("Malformed request: {msg}"),
            AppError::Llm(e) => tracing::error!("LLM error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let body = Json(json!({ "error": self.public_message() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request_with_message() {
        let err = AppError::Validation("resume is empty".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "resume is empty");
    }

    #[test]
    fn test_llm_error_is_generic_500() {
        let err = AppError::from(LlmError::MissingApiKey);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), AI_REQUEST_FAILED);
    }

    #[test]
    fn test_render_failure_is_internal_without_details() {
        let source = anyhow::anyhow!("Variable `result.score` not found in context");
        let err = AppError::from(source.context("Failed to render analysis page"));
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.public_message().contains("result.score"));
    }

    #[test]
    fn test_malformed_request_does_not_leak_details() {
        let err = AppError::MalformedRequest("missing field `job`".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.public_message().contains("job"));
    }
}
