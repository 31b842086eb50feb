//! HTTP API handlers for tutor-ai

pub mod auth;
pub mod health;
pub mod learn;
pub mod preview_images;

pub use auth::{auth_middleware, ClientIdentity};
pub use health::health_routes;
pub use learn::learn;
pub use preview_images::preview_images;
