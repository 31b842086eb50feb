//! POST /learn

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde_json::Value;
use tracing::debug;

use crate::api::auth::ClientIdentity;
use crate::error::LearnError;
use crate::models::ResponseEnvelope;
use crate::AppState;

/// Generate adapted, multimodal tutoring content for a topic
///
/// The body is taken as raw JSON so that validation can report every
/// missing field in one response instead of failing on the first. A body
/// that is not JSON at all counts as empty and gets the same structured
/// 400 as a body missing both fields.
pub async fn learn(
    State(state): State<AppState>,
    Extension(client): Extension<ClientIdentity>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, LearnError> {
    debug!(client = %client.0, "POST /learn");
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!(client = %client.0, "Unreadable /learn body: {}", rejection.body_text());
            Value::Null
        }
    };
    let envelope = state.orchestrator.handle(&body).await?;
    Ok(Json(envelope))
}
