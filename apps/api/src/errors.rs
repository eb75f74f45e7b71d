use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::evaluation::models::ValidationError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant ends the current request; none of them takes the process down.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Malformed model response: {reason}")]
    MalformedResponse { reason: String, raw: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
    retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_response: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Upstream(_) | AppError::MalformedResponse { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::UpstreamTimeout(_) => "UPSTREAM_TIMEOUT",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller may reasonably send the same request again.
    pub fn retryable(&self) -> bool {
        matches!(self, AppError::UpstreamTimeout(_))
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout => AppError::UpstreamTimeout(
                "The language model did not answer in time. The request may be retried."
                    .to_string(),
            ),
            LlmError::Unreachable(detail) => {
                tracing::error!("Completion backend unreachable: {detail}");
                AppError::ServiceUnavailable(
                    "The language model backend is unreachable. Try again later.".to_string(),
                )
            }
            LlmError::Unauthorized { status } => {
                tracing::error!("Completion backend rejected the configured credential ({status})");
                AppError::ServiceUnavailable(
                    "The language model backend is not available. Contact the service operator."
                        .to_string(),
                )
            }
            LlmError::Api { status, message } if status == 429 || status >= 500 => {
                tracing::error!("Completion backend unavailable ({status}): {message}");
                AppError::ServiceUnavailable(
                    "The language model backend is temporarily unavailable.".to_string(),
                )
            }
            LlmError::EmptyContent => AppError::MalformedResponse {
                reason: "model returned no text".to_string(),
                raw: String::new(),
            },
            other => {
                tracing::error!("Completion call failed: {other}");
                AppError::Upstream("The language model call failed.".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let retryable = self.retryable();

        let (message, raw_response) = match self {
            AppError::Validation(msg)
            | AppError::ServiceUnavailable(msg)
            | AppError::UpstreamTimeout(msg)
            | AppError::Upstream(msg) => (msg, None),
            AppError::MalformedResponse { reason, raw } => {
                tracing::warn!("Malformed model response ({reason}): {raw:?}");
                (
                    format!("Could not parse the model's reply: {reason}"),
                    Some(raw),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                ("An internal server error occurred".to_string(), None)
            }
        };

        let body = Json(ErrorEnvelope {
            error: ErrorBody {
                kind,
                message,
                retryable,
                raw_response,
            },
        });

        (status, body).into_response()
    }
}
