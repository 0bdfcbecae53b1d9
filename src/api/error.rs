//! API error types with structured JSON responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::EngineError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    /// The offending input token, for `UNKNOWN_SYMPTOM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unknown symptom: {token}")]
    UnknownSymptom { token: String },
    #[error("No symptoms supplied")]
    EmptyQuery,
    #[error("k must be at least 1 (got {k})")]
    InvalidK { k: usize },
    #[error("Invalid context: {0}")]
    InvalidContext(String),
    #[error("Prediction unavailable: {0}")]
    PredictionUnavailable(String),
    #[error("Superseded by a newer request")]
    Superseded,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, token) = match self {
            ApiError::UnknownSymptom { token } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNKNOWN_SYMPTOM",
                format!("Unknown symptom: {token}"),
                Some(token),
            ),
            ApiError::EmptyQuery => (
                StatusCode::BAD_REQUEST,
                "EMPTY_QUERY",
                "At least one symptom is required".to_string(),
                None,
            ),
            ApiError::InvalidK { k } => (
                StatusCode::BAD_REQUEST,
                "INVALID_K",
                format!("k must be at least 1 (got {k})"),
                None,
            ),
            ApiError::InvalidContext(detail) => {
                (StatusCode::BAD_REQUEST, "INVALID_CONTEXT", detail, None)
            }
            ApiError::PredictionUnavailable(detail) => {
                tracing::warn!(detail = %detail, "Prediction unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "PREDICTION_UNAVAILABLE",
                    "Prediction service is unavailable, try again later".to_string(),
                    None,
                )
            }
            ApiError::Superseded => (
                StatusCode::CONFLICT,
                "SUPERSEDED",
                "A newer request from this client replaced this one".to_string(),
                None,
            ),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail, None),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                token,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::UnknownSymptom { token } => ApiError::UnknownSymptom { token },
            EngineError::EmptyQuery => ApiError::EmptyQuery,
            EngineError::InvalidK { k } => ApiError::InvalidK { k },
            EngineError::InvalidContext(detail) => ApiError::InvalidContext(detail),
            EngineError::PredictionUnavailable(failure) => {
                ApiError::PredictionUnavailable(failure.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
