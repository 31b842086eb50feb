//! Request authentication via timestamp and hash validation
//!
//! # Scheme
//!
//! - Every protected request carries `timestamp` (i64 Unix epoch ms) and
//!   `hash` (SHA-256, 64 hex chars)
//! - Timestamp must be within ≤1000ms past and ≤1ms future
//! - Hash is calculated from canonical JSON + shared secret
//! - A shared secret of 0 disables checking entirely
//!
//! POST bodies are hashed as a whole (with the `hash` field zeroed). GET
//! requests carry the fields as query parameters and hash `{timestamp, hash}`.
//!
//! This module holds pure functions only. The axum middleware that applies
//! them lives in the service crate.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Placeholder written over the `hash` field before hashing
pub const DUMMY_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Maximum accepted request age in milliseconds
pub const MAX_PAST_MS: i64 = 1000;

/// Maximum accepted clock skew into the future in milliseconds
pub const MAX_FUTURE_MS: i64 = 1;

// ========================================
// Error Types
// ========================================

/// Authentication error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiAuthError {
    /// Timestamp outside acceptable window
    #[error("Invalid timestamp: {reason}")]
    InvalidTimestamp {
        timestamp: i64,
        now: i64,
        reason: String,
    },

    /// Hash does not match calculated value
    #[error("Invalid hash")]
    InvalidHash { provided: String, calculated: String },

    /// Timestamp field missing from request
    #[error("Missing timestamp field")]
    MissingTimestamp,

    /// Hash field missing from request
    #[error("Missing hash field")]
    MissingHash,

    /// Failed to parse request body
    #[error("Parse error: {0}")]
    ParseError(String),
}

// ========================================
// Shared Secret
// ========================================

/// Generate a random non-zero shared secret
///
/// Zero is reserved: it disables authentication.
pub fn generate_shared_secret() -> i64 {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    loop {
        let val = rng.gen::<i64>();
        if val != 0 {
            break val;
        }
    }
}

/// Current time as Unix epoch milliseconds
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

// ========================================
// Timestamp Validation
// ========================================

/// Validate a request timestamp against the current clock
///
/// # Examples
///
/// ```
/// use tutor_common::api::auth::{now_millis, validate_timestamp};
///
/// let now = now_millis();
/// assert!(validate_timestamp(now).is_ok());
/// assert!(validate_timestamp(now - 500).is_ok());
/// assert!(validate_timestamp(now - 2000).is_err());
/// ```
pub fn validate_timestamp(timestamp: i64) -> Result<(), ApiAuthError> {
    validate_timestamp_at(timestamp, now_millis())
}

/// Validate `timestamp` against an explicit `now`
///
/// The window is asymmetric: past tolerance absorbs processing delay, future
/// tolerance only covers clock drift.
pub fn validate_timestamp_at(timestamp: i64, now: i64) -> Result<(), ApiAuthError> {
    let diff = now - timestamp;

    if diff > MAX_PAST_MS {
        return Err(ApiAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: format!("Timestamp {}ms too old (max {}ms past)", diff, MAX_PAST_MS),
        });
    }

    if diff < -MAX_FUTURE_MS {
        return Err(ApiAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: format!(
                "Timestamp {}ms in future (max {}ms future)",
                diff.abs(),
                MAX_FUTURE_MS
            ),
        });
    }

    Ok(())
}

// ========================================
// Hash Calculation and Validation
// ========================================

/// Calculate the request hash
///
/// # Algorithm
///
/// 1. Replace the `hash` field with [`DUMMY_HASH`]
/// 2. Convert to canonical JSON (sorted keys, no whitespace)
/// 3. Append the shared secret as a decimal string
/// 4. SHA-256, rendered as 64 lowercase hex characters
///
/// # Examples
///
/// ```
/// use tutor_common::api::auth::calculate_hash;
/// use serde_json::json;
///
/// let body = json!({ "text": "Explain gravity", "timestamp": 1730000000000i64, "hash": "x" });
/// assert_eq!(calculate_hash(&body, 42).len(), 64);
/// ```
pub fn calculate_hash(json_value: &Value, shared_secret: i64) -> String {
    let mut value = json_value.clone();
    if let Some(obj) = value.as_object_mut() {
        obj.insert("hash".to_string(), Value::String(DUMMY_HASH.to_string()));
    }

    let canonical = to_canonical_json(&value);
    let to_hash = format!("{}{}", canonical, shared_secret);

    let mut hasher = Sha256::new();
    hasher.update(to_hash.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Convert JSON to canonical form (sorted keys, no whitespace)
///
/// ```
/// use tutor_common::api::auth::to_canonical_json;
/// use serde_json::json;
///
/// let canonical = to_canonical_json(&json!({"z": 3, "a": [1, 2]}));
/// assert_eq!(canonical, r#"{"a":[1,2],"z":3}"#);
/// ```
pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<_> = map.iter().collect();
            pairs.sort_by_key(|(k, _)| *k);
            let items: Vec<String> = pairs
                .into_iter()
                .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), to_canonical_json(v)))
                .collect();
            format!("{{{}}}", items.join(","))
        }
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        // serde_json's Display for scalars is already compact and escaped
        other => other.to_string(),
    }
}

/// Validate that `provided_hash` matches the value calculated for `json_value`
pub fn validate_hash(
    provided_hash: &str,
    json_value: &Value,
    shared_secret: i64,
) -> Result<(), ApiAuthError> {
    let calculated = calculate_hash(json_value, shared_secret);

    if provided_hash != calculated {
        return Err(ApiAuthError::InvalidHash {
            provided: provided_hash.to_string(),
            calculated,
        });
    }

    Ok(())
}

/// Authenticate a JSON request body that embeds `timestamp` and `hash`
pub fn authenticate_body(body: &Value, shared_secret: i64) -> Result<(), ApiAuthError> {
    let timestamp = body
        .get("timestamp")
        .ok_or(ApiAuthError::MissingTimestamp)?
        .as_i64()
        .ok_or_else(|| ApiAuthError::ParseError("timestamp must be an integer".to_string()))?;
    let hash = body
        .get("hash")
        .ok_or(ApiAuthError::MissingHash)?
        .as_str()
        .ok_or_else(|| ApiAuthError::ParseError("hash must be a string".to_string()))?;

    validate_timestamp(timestamp)?;
    validate_hash(hash, body, shared_secret)
}

/// Authenticate query-string credentials (GET requests)
pub fn authenticate_query(
    timestamp: Option<i64>,
    hash: Option<&str>,
    shared_secret: i64,
) -> Result<(), ApiAuthError> {
    let timestamp = timestamp.ok_or(ApiAuthError::MissingTimestamp)?;
    let hash = hash.ok_or(ApiAuthError::MissingHash)?;

    validate_timestamp(timestamp)?;
    let value = serde_json::json!({ "timestamp": timestamp, "hash": hash });
    validate_hash(hash, &value, shared_secret)
}

// ========================================
// Tests
// ========================================
