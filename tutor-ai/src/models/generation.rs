//! Language-model request and response types

use serde::Serialize;

/// Sampling parameters for one generation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationParams {
    pub const DEFAULT: GenerationParams = GenerationParams {
        temperature: 0.7,
        max_output_tokens: 1500,
    };

    /// Tighter, shorter output for dyslexia support
    pub const DYSLEXIA: GenerationParams = GenerationParams {
        temperature: 0.3,
        max_output_tokens: 1000,
    };

    pub const LANGUAGE_LEARNER: GenerationParams = GenerationParams {
        temperature: 0.4,
        max_output_tokens: 1200,
    };
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Speaker of one conversational turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of a conversation with the language model
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Everything the language model needs for one exchange
///
/// `turns` is the full conversation so far and always ends with a user turn.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_directive: String,
    pub params: GenerationParams,
    pub turns: Vec<ChatTurn>,
}

/// Output of the content generator: text and its key terms, always together
#[derive(Debug, Clone)]
pub struct GeneratedContent {
    pub text: String,
    pub key_terms: Vec<String>,
}
