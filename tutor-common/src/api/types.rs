//! Shared API request/response types for authentication

use serde::{Deserialize, Serialize};

/// Authentication parameters for GET requests (query parameters)
///
/// Fields are optional so that a missing parameter maps to a precise error
/// instead of a generic query rejection.
///
/// ```
/// // GET /preview-images/atom?timestamp=1730000000000&hash=abc123...
/// use tutor_common::api::types::AuthQuery;
///
/// let query: AuthQuery = serde_json::from_str(r#"{"timestamp": 1730000000000}"#).unwrap();
/// assert!(query.hash.is_none());
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthQuery {
    /// Unix epoch time in milliseconds
    pub timestamp: Option<i64>,

    /// SHA-256 hash (64 hex chars)
    pub hash: Option<String>,
}

/// Error body returned when authentication fails
#[derive(Debug, Clone, Serialize)]
pub struct AuthErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl AuthErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_response_shape() {
        let json = serde_json::to_value(AuthErrorResponse::new("Invalid hash")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Invalid hash"}));
    }
}
