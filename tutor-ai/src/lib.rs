//! tutor-ai library interface
//!
//! Adaptive tutoring service: turns a topic plus a learner profile into
//! adapted text, supporting images and optional narration.

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult, LearnError};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::clients::{
    ClientError, GeminiClient, GoogleTtsClient, ImageSearch, LanguageModel, SpeechSynthesis,
    WikimediaClient,
};
use crate::config::{Environment, ServiceConfig};
use crate::services::LearnOrchestrator;

/// Application state shared across handlers
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<LearnOrchestrator>,
    /// Image lookup shared with `/preview-images`
    pub images: Arc<dyn ImageSearch>,
    /// Shared secret for request authentication (0 = disabled)
    pub shared_secret: i64,
    pub environment: Environment,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        images: Arc<dyn ImageSearch>,
        speech: Arc<dyn SpeechSynthesis>,
        environment: Environment,
        shared_secret: i64,
    ) -> Self {
        let orchestrator = LearnOrchestrator::new(
            model,
            images.clone(),
            speech,
            environment.is_development(),
        );

        Self {
            orchestrator: Arc::new(orchestrator),
            images,
            shared_secret,
            environment,
            startup_time: Utc::now(),
        }
    }

    /// Build the production clients from resolved configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ClientError> {
        let model = GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
            config.request_timeout,
        )?;
        let images = WikimediaClient::new(
            config.image_search_base_url.clone(),
            config.request_timeout,
        )?;
        let speech = GoogleTtsClient::new(
            config.speech_api_key.clone(),
            config.speech_base_url.clone(),
            config.request_timeout,
        )?;

        Ok(Self::new(
            Arc::new(model),
            Arc::new(images),
            Arc::new(speech),
            config.environment,
            config.shared_secret,
        ))
    }
}

/// Build application router
///
/// `/learn` and `/preview-images/:term` sit behind authentication;
/// `/health` does not.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let protected = Router::new()
        .route("/learn", post(api::learn))
        .route("/preview-images/:term", get(api::preview_images))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let public = Router::new().merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
