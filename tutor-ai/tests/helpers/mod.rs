//! Test helper utilities
//!
//! Shared setup for the tutor-ai integration tests

#![allow(dead_code)]

pub mod mocks;

pub use mocks::{MockImages, MockModel, MockSpeech};

use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tutor_ai::config::Environment;
use tutor_ai::{build_router, AppState};

/// Mocks plus the router wired to them
pub struct TestApp {
    pub router: Router,
    pub model: Arc<MockModel>,
    pub images: Arc<MockImages>,
    pub speech: Arc<MockSpeech>,
}

/// Build a router over fresh mocks
pub fn test_app(environment: Environment, shared_secret: i64) -> TestApp {
    let model = Arc::new(MockModel::new());
    let images = Arc::new(MockImages::new());
    let speech = Arc::new(MockSpeech::new());

    let state = AppState::new(
        model.clone(),
        images.clone(),
        speech.clone(),
        environment,
        shared_secret,
    );

    TestApp {
        router: build_router(state),
        model,
        images,
        speech,
    }
}

/// Production app with authentication disabled
pub fn open_app() -> TestApp {
    test_app(Environment::Production, 0)
}

/// A complete profile declaring `needs`
pub fn profile(needs: &[&str]) -> Value {
    json!({
        "learningNeeds": needs,
        "culturalBackground": "X",
        "academicLevel": "basic",
        "interests": ["science"],
        "learningGoals": ["understand gravity"]
    })
}

pub fn learn_body(text: &str, needs: &[&str]) -> Value {
    json!({ "text": text, "userProfile": profile(needs) })
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// POST an arbitrary body, with or without a content type
pub fn post_raw(uri: &str, body: &str, content_type: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
