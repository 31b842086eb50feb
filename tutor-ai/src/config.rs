//! Configuration for tutor-ai
//!
//! Two tiers: CLI arguments override the TOML file, which overrides built-in
//! defaults. API keys resolve ENV → TOML.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};
use tutor_common::config::{load_or_default, resolve_secret, ConfigFileResolver, LoggingConfig};
use tutor_common::{Error, Result};

use crate::clients::{gemini, google_tts, wikimedia};

/// Module name used for config discovery (`tutor-ai.toml`, `TUTOR_AI_CONFIG`)
pub const MODULE_NAME: &str = "tutor-ai";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5730;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const GEMINI_API_KEY_ENV: &str = "TUTOR_GEMINI_API_KEY";
pub const SPEECH_API_KEY_ENV: &str = "TUTOR_SPEECH_API_KEY";
pub const ENVIRONMENT_ENV: &str = "TUTOR_ENVIRONMENT";

/// Deployment environment
///
/// Development exposes error chains in 500 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(Error::InvalidInput(format!(
                "Unknown environment '{}' (expected development or production)",
                other
            ))),
        }
    }
}

/// `[language_model]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LanguageModelConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// `[image_search]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageSearchConfig {
    pub base_url: Option<String>,
}

/// `[speech]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

/// Contents of `tutor-ai.toml`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub logging: LoggingConfig,
    /// 0 disables request authentication
    pub shared_secret: i64,
    pub request_timeout_secs: u64,
    pub language_model: LanguageModelConfig,
    pub image_search: ImageSearchConfig,
    pub speech: SpeechConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: Environment::default(),
            logging: LoggingConfig::default(),
            shared_secret: 0,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            language_model: LanguageModelConfig::default(),
            image_search: ImageSearchConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Discover and load the TOML file, falling back to defaults
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        load_or_default(&ConfigFileResolver::new(MODULE_NAME), cli_path)
    }
}

/// Command-line overrides (highest priority)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub shared_secret: i64,
    pub request_timeout: Duration,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub image_search_base_url: String,
    pub speech_api_key: Option<String>,
    pub speech_base_url: String,
}

impl ServiceConfig {
    /// Merge CLI, environment and TOML into a runtime config
    ///
    /// A missing language-model key is fatal. A missing speech key is not:
    /// synthesis then fails per request and responses carry no audio.
    pub fn resolve(toml: TomlConfig, cli: CliOverrides) -> Result<Self> {
        let gemini_api_key = resolve_secret(
            "Gemini API key",
            GEMINI_API_KEY_ENV,
            toml.language_model.api_key.as_deref(),
        )
        .ok_or_else(|| {
            Error::Config(format!(
                "Gemini API key not configured. Set {} or add api_key under [language_model] in {}.toml",
                GEMINI_API_KEY_ENV, MODULE_NAME
            ))
        })?;

        let speech_api_key =
            resolve_secret("Speech API key", SPEECH_API_KEY_ENV, toml.speech.api_key.as_deref());
        if speech_api_key.is_none() {
            warn!(
                "Speech API key not configured ({}); responses will carry no audio",
                SPEECH_API_KEY_ENV
            );
        }

        let environment = match std::env::var(ENVIRONMENT_ENV) {
            Ok(value) => {
                let env: Environment = value.parse()?;
                info!("Environment {} set from {}", env, ENVIRONMENT_ENV);
                env
            }
            Err(_) => toml.environment,
        };

        if toml.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            host: cli.host.unwrap_or(toml.host),
            port: cli.port.unwrap_or(toml.port),
            environment,
            shared_secret: toml.shared_secret,
            request_timeout: Duration::from_secs(toml.request_timeout_secs),
            gemini_api_key,
            gemini_model: toml
                .language_model
                .model
                .unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string()),
            gemini_base_url: toml
                .language_model
                .base_url
                .unwrap_or_else(|| gemini::DEFAULT_BASE_URL.to_string()),
            image_search_base_url: toml
                .image_search
                .base_url
                .unwrap_or_else(|| wikimedia::DEFAULT_BASE_URL.to_string()),
            speech_api_key,
            speech_base_url: toml
                .speech
                .base_url
                .unwrap_or_else(|| google_tts::DEFAULT_BASE_URL.to_string()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
