use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::browser::BrowserError;
use crate::llm_client::LlmError;

/// Message surfaced when the model answers without any text.
pub const EMPTY_RESPONSE_MESSAGE: &str = "Failed to generate text";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to generate text")]
    EmptyResponse,

    #[error("Not a job description: {0}")]
    NotAJobDescription(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::EmptyResponse
            | AppError::NotAJobDescription(_)
            | AppError::ExtractionFailed(_) => StatusCode::BAD_REQUEST,
            AppError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            AppError::Llm(_) | AppError::Browser(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::EmptyResponse => "EMPTY_RESPONSE",
            AppError::NotAJobDescription(_) => "NOT_A_JOB_DESCRIPTION",
            AppError::ExtractionFailed(_) => "EXTRACTION_FAILED",
            AppError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Browser(_) => "BROWSER_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The message shown to the caller. Client errors carry the upstream reason
    /// verbatim; internal faults are replaced with a fixed string.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::NotAJobDescription(msg)
            | AppError::ExtractionFailed(msg) => msg.clone(),
            AppError::EmptyResponse => EMPTY_RESPONSE_MESSAGE.to_string(),
            AppError::MalformedResponse(_) => {
                "The AI service returned an unreadable response".to_string()
            }
            AppError::Llm(_) => "An AI processing error occurred".to_string(),
            AppError::Browser(_) => "A browser automation error occurred".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Parse(e) => AppError::MalformedResponse(e.to_string()),
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl From<BrowserError> for AppError {
    fn from(err: BrowserError) -> Self {
        match err {
            timeout @ BrowserError::NavigationTimeout { .. } => {
                AppError::ExtractionFailed(timeout.to_string())
            }
            BrowserError::Parse(e) => AppError::MalformedResponse(e.to_string()),
            other => AppError::Browser(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed upstream response: {msg}")
            }
            AppError::Llm(msg) => tracing::error!("LLM error: {msg}"),
            AppError::Browser(msg) => tracing::error!("Browser error: {msg}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            _ => {}
        }

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.public_message()
            }
        }));

        (status, body).into_response()
    }
}
