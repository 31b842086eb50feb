//! Authentication middleware for tutor-ai
//!
//! Protected requests carry `timestamp` + `hash`: in the JSON body for POST,
//! as query parameters for GET. A shared secret of 0 disables checking.

use axum::{
    body::Body,
    extract::{Query, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, warn};
use tutor_common::api::{
    authenticate_body, authenticate_query, ApiAuthError, AuthErrorResponse, AuthQuery,
};

use crate::AppState;

/// Header naming the calling client
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Request body limit for hashing (1 MiB)
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Caller identity attached to authenticated requests
///
/// Only used for logging; no per-client behavior depends on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity(pub String);

impl ClientIdentity {
    pub const ANONYMOUS: &'static str = "anonymous";

    fn from_request(request: &Request) -> Self {
        let id = request
            .headers()
            .get(CLIENT_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(Self::ANONYMOUS);
        Self(id.to_string())
    }
}

/// Authentication middleware
///
/// Applied to protected routes only; `/health` stays public.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = ClientIdentity::from_request(&request);

    if state.shared_secret == 0 {
        request.extensions_mut().insert(identity);
        return Ok(next.run(request).await);
    }

    let mut request = if request.method() == Method::GET {
        let Query(query) = Query::<AuthQuery>::try_from_uri(request.uri())
            .map_err(|e| AuthError::Parse(format!("Invalid query: {}", e)))?;
        authenticate_query(query.timestamp, query.hash.as_deref(), state.shared_secret)
            .map_err(|e| AuthError::from_auth(e, &identity))?;
        request
    } else {
        let (parts, body) = request.into_parts();
        let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| AuthError::Parse(format!("Failed to read body: {}", e)))?;
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| AuthError::Parse(format!("Invalid JSON: {}", e)))?;

        authenticate_body(&value, state.shared_secret)
            .map_err(|e| AuthError::from_auth(e, &identity))?;

        Request::from_parts(parts, Body::from(bytes))
    };

    debug!(client = %identity.0, "Request authenticated");
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Authentication failures as HTTP responses
#[derive(Debug)]
pub enum AuthError {
    InvalidTimestamp(String),
    InvalidHash,
    MissingFields(String),
    Parse(String),
}

impl AuthError {
    fn from_auth(err: ApiAuthError, identity: &ClientIdentity) -> Self {
        match err {
            ApiAuthError::InvalidTimestamp { reason, .. } => {
                warn!(client = %identity.0, "Rejected request: {}", reason);
                AuthError::InvalidTimestamp(reason)
            }
            ApiAuthError::InvalidHash { provided, calculated } => {
                warn!(
                    client = %identity.0,
                    "Hash validation failed: provided={}, calculated={}",
                    provided, calculated
                );
                AuthError::InvalidHash
            }
            ApiAuthError::MissingTimestamp => AuthError::MissingFields("timestamp".to_string()),
            ApiAuthError::MissingHash => AuthError::MissingFields("hash".to_string()),
            ApiAuthError::ParseError(msg) => AuthError::Parse(msg),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::InvalidTimestamp(reason) => {
                (StatusCode::UNAUTHORIZED, format!("Invalid timestamp: {}", reason))
            }
            AuthError::InvalidHash => (StatusCode::UNAUTHORIZED, "Invalid hash".to_string()),
            AuthError::MissingFields(field) => {
                (StatusCode::BAD_REQUEST, format!("Missing required fields: {}", field))
            }
            AuthError::Parse(msg) => (StatusCode::BAD_REQUEST, format!("Parse error: {}", msg)),
        };

        (status, Json(AuthErrorResponse::new(message))).into_response()
    }
}
