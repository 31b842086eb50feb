//! Outbound service clients
//!
//! Each external collaborator sits behind a trait so the pipeline never
//! depends on a vendor SDK and tests can substitute in-process fakes.
//!
//! | Trait             | Implementation     | Service                          |
//! |-------------------|--------------------|----------------------------------|
//! | `LanguageModel`   | `GeminiClient`     | Gemini `generateContent` REST    |
//! | `ImageSearch`     | `WikimediaClient`  | Wikimedia Commons query API      |
//! | `SpeechSynthesis` | `GoogleTtsClient`  | Cloud Text-to-Speech REST        |

pub mod gemini;
pub mod google_tts;
pub mod wikimedia;

pub use gemini::GeminiClient;
pub use google_tts::GoogleTtsClient;
pub use wikimedia::WikimediaClient;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::models::{GenerationRequest, ImageDescriptor, VoiceParameters};

/// User agent sent with every outbound request
pub const USER_AGENT: &str = concat!("adaptive-tutor/", env!("CARGO_PKG_VERSION"));

/// Errors shared by all outbound clients
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("API key not configured for {0}")]
    MissingApiKey(&'static str),
}

impl ClientError {
    /// Map a reqwest error, distinguishing timeouts
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(timeout)
        } else {
            ClientError::NetworkError(err.to_string())
        }
    }
}

/// Build the shared reqwest client configuration used by every service client
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| ClientError::NetworkError(e.to_string()))
}

/// Turn a non-success response into `ClientError::ApiError`
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::ApiError(status.as_u16(), body))
}

/// Generative language model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Run one exchange: send the conversation, return the model's reply text
    async fn complete(&self, request: &GenerationRequest) -> Result<String, ClientError>;
}

/// Image search service
#[async_trait]
pub trait ImageSearch: Send + Sync {
    fn name(&self) -> &'static str;

    /// Search for up to `limit` candidate images for `term`
    ///
    /// Candidates are returned unfiltered; callers apply
    /// [`retain_displayable`](crate::models::retain_displayable).
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<ImageDescriptor>, ClientError>;
}

/// Speech synthesis service
#[async_trait]
pub trait SpeechSynthesis: Send + Sync {
    fn name(&self) -> &'static str;

    /// Synthesize `text` to MP3 bytes
    async fn synthesize(&self, text: &str, voice: &VoiceParameters) -> Result<Vec<u8>, ClientError>;
}
