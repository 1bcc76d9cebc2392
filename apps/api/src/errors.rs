use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::parser::ParseError;
use crate::analysis::prompt_builder::PromptError;
use crate::extraction::ExtractError;
use crate::llm_client::InferenceError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction failure: {0}")]
    ExtractionFailure(String),

    #[error("Inference provider rejected the API key: {0}")]
    Authentication(String),

    #[error("Inference provider rate limit reached: {0}")]
    RateLimited(String),

    #[error("Inference provider unreachable: {0}")]
    Network(String),

    #[error("Inference provider error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::EmptyInput(msg) => (StatusCode::BAD_REQUEST, "EMPTY_INPUT", msg.clone()),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "FILE_TOO_LARGE",
                msg.clone(),
            ),
            AppError::UnsupportedFormat(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                format!("File type not supported ({msg}). Please upload .pdf, .docx, .txt"),
            ),
            AppError::ExtractionFailure(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_FAILED",
                format!("Could not read the document: {msg}"),
            ),
            AppError::Authentication(msg) => {
                tracing::error!("Inference authentication failed: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_AUTHENTICATION_FAILED",
                    "The AI service rejected the server's credentials".to_string(),
                )
            }
            AppError::RateLimited(msg) => {
                tracing::warn!("Inference rate limited: {msg}");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "RATE_LIMITED",
                    "The AI service is busy, please try again in a moment".to_string(),
                )
            }
            AppError::Network(msg) => {
                tracing::error!("Inference network error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "UPSTREAM_UNREACHABLE",
                    "The AI service could not be reached".to_string(),
                )
            }
            AppError::Upstream { status, message } => {
                tracing::error!("Inference upstream error {status}: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    format!("The AI service returned an error (status {status})"),
                )
            }
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed model response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_MODEL_RESPONSE",
                    "The AI service returned a response in an unexpected shape".to_string(),
                )
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

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedFormat(what) => AppError::UnsupportedFormat(what),
            ExtractError::ExtractionFailure(msg) => AppError::ExtractionFailure(msg),
        }
    }
}

impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        AppError::EmptyInput(err.to_string())
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::Authentication(msg) => AppError::Authentication(msg),
            InferenceError::RateLimited(msg) => AppError::RateLimited(msg),
            InferenceError::Network(e) => AppError::Network(e.to_string()),
            InferenceError::Upstream { status, message } => AppError::Upstream { status, message },
            InferenceError::EmptyCompletion => {
                AppError::MalformedResponse("model returned no completion text".to_string())
            }
        }
    }
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge(
                "Uploaded file exceeds the maximum allowed size".to_string(),
            );
        }
        AppError::Validation(format!("Invalid multipart upload: {}", err.body_text()))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_error_taxonomy() {
        let cases = [
            (AppError::EmptyInput("file".into()), StatusCode::BAD_REQUEST),
            (AppError::PayloadTooLarge("5 MiB".into()), StatusCode::PAYLOAD_TOO_LARGE),
            (AppError::UnsupportedFormat(".odt".into()), StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (AppError::ExtractionFailure("bad".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::Authentication("401".into()), StatusCode::BAD_GATEWAY),
            (AppError::RateLimited("429".into()), StatusCode::TOO_MANY_REQUESTS),
            (AppError::Network("timeout".into()), StatusCode::SERVICE_UNAVAILABLE),
            (
                AppError::Upstream {
                    status: 500,
                    message: "boom".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (AppError::MalformedResponse("x".into()), StatusCode::BAD_GATEWAY),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_empty_completion_maps_to_malformed_response() {
        let err: AppError = InferenceError::EmptyCompletion.into();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_extract_error_keeps_its_kind() {
        let err: AppError = ExtractError::UnsupportedFormat(".rtf".into()).into();
        assert!(matches!(err, AppError::UnsupportedFormat(ref s) if s == ".rtf"));
    }
}
