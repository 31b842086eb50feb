//! Cloud Text-to-Speech REST client

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{build_http_client, ensure_success, ClientError, SpeechSynthesis};
use crate::models::VoiceParameters;

pub const DEFAULT_BASE_URL: &str = "https://texttospeech.googleapis.com/v1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    ssml_gender: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f32,
    pitch: f32,
    volume_gain_db: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

fn build_body<'a>(text: &'a str, voice: &'a VoiceParameters) -> SynthesizeRequest<'a> {
    SynthesizeRequest {
        input: SynthesisInput { text },
        voice: VoiceSelection {
            language_code: &voice.language_code,
            ssml_gender: "NEUTRAL",
        },
        audio_config: AudioConfig {
            audio_encoding: "MP3",
            speaking_rate: voice.speaking_rate,
            pitch: voice.pitch,
            volume_gain_db: voice.volume_gain_db,
        },
    }
}

fn decode_audio(response: SynthesizeResponse) -> Result<Vec<u8>, ClientError> {
    let encoded = response
        .audio_content
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ClientError::EmptyResponse("no audioContent".to_string()))?;

    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| ClientError::ParseError(format!("audioContent is not base64: {}", e)))
}

/// Text-to-Speech client
///
/// Without an API key every call fails with `MissingApiKey` before touching
/// the network.
pub struct GoogleTtsClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl GoogleTtsClient {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
        })
    }
}

#[async_trait]
impl SpeechSynthesis for GoogleTtsClient {
    fn name(&self) -> &'static str {
        "google-tts"
    }

    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceParameters,
    ) -> Result<Vec<u8>, ClientError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ClientError::MissingApiKey("speech synthesis"))?;

        tracing::debug!(
            language = %voice.language_code,
            rate = voice.speaking_rate,
            pitch = voice.pitch,
            gain_db = voice.volume_gain_db,
            chars = text.len(),
            "Requesting speech synthesis"
        );

        let response = self
            .http_client
            .post(format!("{}/text:synthesize", self.base_url))
            .header("x-goog-api-key", api_key)
            .json(&build_body(text, voice))
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.timeout))?;

        let parsed: SynthesizeResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;

        decode_audio(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let voice = VoiceParameters {
            language_code: "es-MX".to_string(),
            speaking_rate: 0.85,
            pitch: -1.0,
            volume_gain_db: 0.0,
        };
        let json = serde_json::to_value(build_body("Hola", &voice)).unwrap();

        assert_eq!(json["input"]["text"], "Hola");
        assert_eq!(json["voice"]["languageCode"], "es-MX");
        assert_eq!(json["voice"]["ssmlGender"], "NEUTRAL");
        assert_eq!(json["audioConfig"]["audioEncoding"], "MP3");
        assert_eq!(json["audioConfig"]["pitch"], -1.0);
    }

    #[test]
    fn test_decode_audio() {
        let response = SynthesizeResponse {
            audio_content: Some("SUQz".to_string()), // "ID3"
        };
        assert_eq!(decode_audio(response).unwrap(), b"ID3".to_vec());
    }

    #[test]
    fn test_decode_audio_missing_content() {
        let response = SynthesizeResponse { audio_content: None };
        assert!(matches!(decode_audio(response), Err(ClientError::EmptyResponse(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let client = GoogleTtsClient::new(
            None,
            "http://127.0.0.1:9".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();

        let result = client
            .synthesize("text", &VoiceParameters::neutral("en-US"))
            .await;
        assert!(matches!(result, Err(ClientError::MissingApiKey(_))));
    }
}
