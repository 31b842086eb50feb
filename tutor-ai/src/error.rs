//! Error types for tutor-ai
//!
//! Pipeline errors follow the propagation policy of the content pipeline:
//! - `ValidationError` and `GenerationError` terminate a request
//! - image lookup failures are absorbed inside visual enrichment
//! - `SynthesisError` is absorbed by the orchestrator (audio omitted)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::clients::ClientError;

/// Generic message returned for failed content generation
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate enhanced response";

/// Malformed or incomplete `/learn` input (400)
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// Topic text and/or the profile itself is missing
    #[error("Missing required information")]
    MissingInformation {
        text: Option<String>,
        user_profile: Option<String>,
    },

    /// Required profile fields are absent; every missing field is listed
    #[error("Incomplete user profile: missing {}", missing_fields.join(", "))]
    IncompleteProfile { missing_fields: Vec<String> },

    /// Profile fields are present but hold unrecognized or mistyped values
    #[error("Invalid user profile: {0}")]
    InvalidProfile(String),
}

impl ValidationError {
    fn body(&self) -> Value {
        match self {
            ValidationError::MissingInformation { text, user_profile } => json!({
                "error": "Missing required information",
                "details": {
                    "text": text,
                    "userProfile": user_profile,
                }
            }),
            ValidationError::IncompleteProfile { missing_fields } => json!({
                "error": "Incomplete user profile",
                "missingFields": missing_fields,
            }),
            ValidationError::InvalidProfile(message) => json!({
                "error": "Invalid user profile",
                "details": { "userProfile": message },
            }),
        }
    }
}

/// Language-model failure on either exchange (aborts the request)
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Content generation failed")]
    Content(#[source] ClientError),

    #[error("Key term extraction failed")]
    KeyTerms(#[source] ClientError),
}

/// Speech-synthesis failure (recovered by omitting audio)
#[derive(Debug, Error)]
#[error("Speech synthesis failed: {0}")]
pub struct SynthesisError(#[from] pub ClientError);

/// Terminal failure of a `/learn` request
#[derive(Debug, Error)]
pub enum LearnError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `details` carries the error chain only in development builds
    #[error("{source}")]
    Generation {
        source: GenerationError,
        details: Option<String>,
    },
}

impl IntoResponse for LearnError {
    fn into_response(self) -> Response {
        match self {
            LearnError::Validation(err) => {
                (StatusCode::BAD_REQUEST, Json(err.body())).into_response()
            }
            LearnError::Generation { details, .. } => {
                let mut body = json!({ "error": GENERATION_FAILED_MESSAGE });
                if let Some(details) = details {
                    body["details"] = Value::String(details);
                }
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

/// API error type for the remaining handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upstream service failure (500)
    #[error("{0}")]
    Upstream(#[from] ClientError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Render an error and its source chain as one line
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
