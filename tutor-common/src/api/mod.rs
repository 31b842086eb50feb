//! API module for shared HTTP API functionality
//!
//! Contains only pure functions and shared types; no HTTP framework
//! dependencies. Each service wraps these with its own axum middleware.

pub mod auth;
pub mod types;

pub use auth::{
    authenticate_body, authenticate_query, calculate_hash, generate_shared_secret,
    validate_hash, validate_timestamp, ApiAuthError,
};
pub use types::{AuthErrorResponse, AuthQuery};
