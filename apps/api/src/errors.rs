use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::instructions::OptionsError;
use crate::llm_client::GenerationError;
use crate::report::composer::ComposeError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected before any generation call is made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Primary chapter generation failed. Never swallowed.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

impl From<ComposeError> for AppError {
    fn from(e: ComposeError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<OptionsError> for AppError {
    fn from(e: OptionsError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details): (StatusCode, &str, String, Option<Value>) =
            match &self {
                AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
                AppError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
                AppError::Generation(e) => {
                    tracing::error!("Generation error: {e}");
                    match e {
                        GenerationError::MissingCredential => (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "CONFIGURATION_ERROR",
                            "The generation service credential is not configured".to_string(),
                            None,
                        ),
                        GenerationError::UpstreamHttp { status, body } => (
                            StatusCode::BAD_GATEWAY,
                            "UPSTREAM_HTTP_ERROR",
                            format!("The generation service returned HTTP {status}"),
                            Some(json!({ "status": status, "body": body })),
                        ),
                        GenerationError::Transport { message } => (
                            StatusCode::GATEWAY_TIMEOUT,
                            "UPSTREAM_UNREACHABLE",
                            "The generation service could not be reached".to_string(),
                            Some(json!({ "message": message })),
                        ),
                        GenerationError::MalformedResponse { detail } => (
                            StatusCode::BAD_GATEWAY,
                            "MALFORMED_UPSTREAM_RESPONSE",
                            "The generation service returned an unusable response".to_string(),
                            Some(json!({ "detail": detail })),
                        ),
                    }
                }
            };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_generation_errors_map_to_distinct_statuses() {
        assert_eq!(
            status_of(GenerationError::MissingCredential.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(
                GenerationError::UpstreamHttp {
                    status: 429,
                    body: "rate limited".into()
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(
                GenerationError::Transport {
                    message: "timeout".into()
                }
                .into()
            ),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_of(
                GenerationError::MalformedResponse {
                    detail: "no choices".into()
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_compose_errors_are_client_errors() {
        let err: AppError = ComposeError::UnknownChapter("nonexistent".into()).into();
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }
}
