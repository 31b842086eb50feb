//! Request Orchestrator for `/learn`
//!
//! Stages run strictly in sequence:
//!
//! ```text
//! Validating → Generating → Enriching → Synthesizing (optional) → Assembling → Done
//!      └──────────────┴────────────┴──────────→ Failed(reason)
//! ```
//!
//! Validation and generation failures end the request. Enrichment absorbs
//! its own lookup failures; a synthesis failure only drops the audio.

use base64::Engine;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::clients::{ImageSearch, LanguageModel, SpeechSynthesis};
use crate::error::{error_chain, LearnError, ValidationError};
use crate::models::{
    AppliedAdaptation, EnrichedContent, LearnResponse, LearnerProfile, ResponseEnvelope,
    ResponseImage, ResponseMetadata,
};
use crate::services::content_generator::ContentGenerator;
use crate::services::profile_adapter::{self, AdaptedProfile};
use crate::services::speech_synthesizer::SpeechSynthesizer;
use crate::services::visual_enrichment::VisualEnrichment;

/// Profile fields that must be present (and, for needs, non-empty)
pub const REQUIRED_PROFILE_FIELDS: [&str; 5] = [
    "learningNeeds",
    "culturalBackground",
    "academicLevel",
    "interests",
    "learningGoals",
];

/// Request lifecycle stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LearnStage {
    Validating,
    Generating,
    Enriching,
    Synthesizing,
    Assembling,
    Done,
    Failed(String),
}

impl fmt::Display for LearnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LearnStage::Validating => f.write_str("validating"),
            LearnStage::Generating => f.write_str("generating"),
            LearnStage::Enriching => f.write_str("enriching"),
            LearnStage::Synthesizing => f.write_str("synthesizing"),
            LearnStage::Assembling => f.write_str("assembling"),
            LearnStage::Done => f.write_str("done"),
            LearnStage::Failed(reason) => write!(f, "failed({})", reason),
        }
    }
}

/// A validated `/learn` request
#[derive(Debug, Clone)]
pub struct LearnRequest {
    pub text: String,
    pub profile: LearnerProfile,
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

fn missing_profile_fields(profile: &Map<String, Value>) -> Vec<String> {
    REQUIRED_PROFILE_FIELDS
        .iter()
        .filter(|field| {
            let value = profile.get(**field);
            match (**field, value) {
                ("learningNeeds", Some(Value::Array(needs))) => needs.is_empty(),
                _ => is_blank(value),
            }
        })
        .map(|field| field.to_string())
        .collect()
}

/// Validate a raw `/learn` body
///
/// Reports every missing top-level item together, then every missing
/// profile field together, then typed/catalog errors.
pub fn validate_request(body: &Value) -> Result<LearnRequest, ValidationError> {
    let text = body
        .get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let profile = body.get("userProfile").and_then(Value::as_object);

    let (text, profile) = match (text, profile) {
        (Some(text), Some(profile)) => (text, profile),
        (text, profile) => {
            return Err(ValidationError::MissingInformation {
                text: text.is_none().then(|| "Text is required".to_string()),
                user_profile: profile.is_none().then(|| "User profile is required".to_string()),
            })
        }
    };

    let missing_fields = missing_profile_fields(profile);
    if !missing_fields.is_empty() {
        return Err(ValidationError::IncompleteProfile { missing_fields });
    }

    let profile: LearnerProfile = serde_json::from_value(Value::Object(profile.clone()))
        .map_err(|e| ValidationError::InvalidProfile(e.to_string()))?;

    Ok(LearnRequest {
        text: text.to_string(),
        profile,
    })
}

/// Sequences the pipeline for one request at a time; holds no request state
pub struct LearnOrchestrator {
    generator: ContentGenerator,
    enrichment: VisualEnrichment,
    synthesizer: SpeechSynthesizer,
    expose_error_details: bool,
}

impl LearnOrchestrator {
    /// `expose_error_details` adds the error chain to 500 responses
    /// (development only)
    pub fn new(
        model: Arc<dyn LanguageModel>,
        images: Arc<dyn ImageSearch>,
        speech: Arc<dyn SpeechSynthesis>,
        expose_error_details: bool,
    ) -> Self {
        Self {
            generator: ContentGenerator::new(model),
            enrichment: VisualEnrichment::new(images),
            synthesizer: SpeechSynthesizer::new(speech),
            expose_error_details,
        }
    }

    /// Run the full pipeline for a raw request body
    pub async fn handle(&self, body: &Value) -> Result<ResponseEnvelope, LearnError> {
        let request_id = Uuid::new_v4();
        let mut stage = LearnStage::Validating;
        debug!(%request_id, %stage, "Learn request received");

        let request = match validate_request(body) {
            Ok(request) => request,
            Err(e) => return Err(self.fail(request_id, &mut stage, e.into())),
        };

        let adapted = match profile_adapter::adapt(&request.profile) {
            Ok(adapted) => adapted,
            Err(e) => return Err(self.fail(request_id, &mut stage, e.into())),
        };
        let needs = adapted.need_tags();

        self.advance(request_id, &mut stage, LearnStage::Generating);
        let generated = match self.generator.generate(&request.text, &adapted).await {
            Ok(generated) => generated,
            Err(e) => {
                let details = self.expose_error_details.then(|| error_chain(&e));
                return Err(self.fail(
                    request_id,
                    &mut stage,
                    LearnError::Generation { source: e, details },
                ));
            }
        };

        self.advance(request_id, &mut stage, LearnStage::Enriching);
        let enriched = self
            .enrichment
            .enrich(&generated.text, &generated.key_terms, &needs)
            .await;

        self.advance(request_id, &mut stage, LearnStage::Synthesizing);
        let audio = match self
            .synthesizer
            .synthesize(&enriched.text, &needs, &request.profile.language_preference)
            .await
        {
            Ok(audio) => audio,
            Err(e) => {
                warn!(%request_id, error = %e, "Speech synthesis failed; responding without audio");
                None
            }
        };

        self.advance(request_id, &mut stage, LearnStage::Assembling);
        let envelope = assemble(&adapted, enriched, audio);

        self.advance(request_id, &mut stage, LearnStage::Done);
        info!(
            %request_id,
            needs = ?request.profile.learning_needs,
            images = envelope.response.images.len(),
            audio = envelope.metadata.audio_support,
            "Learn request complete"
        );

        Ok(envelope)
    }

    fn advance(&self, request_id: Uuid, stage: &mut LearnStage, next: LearnStage) {
        debug!(%request_id, from = %stage, to = %next, "Stage transition");
        *stage = next;
    }

    fn fail(&self, request_id: Uuid, stage: &mut LearnStage, err: LearnError) -> LearnError {
        let failed = LearnStage::Failed(stage.to_string());
        match &err {
            LearnError::Validation(e) => {
                info!(%request_id, stage = %stage, error = %e, "Learn request rejected")
            }
            LearnError::Generation { source, .. } => {
                error!(
                    %request_id,
                    stage = %stage,
                    error = %error_chain(source),
                    "Learn request failed"
                )
            }
        }
        *stage = failed;
        err
    }
}

/// Build the response envelope
///
/// Support flags reflect what was produced, not what was declared.
pub fn assemble(
    adapted: &AdaptedProfile<'_>,
    enriched: EnrichedContent,
    audio: Option<Vec<u8>>,
) -> ResponseEnvelope {
    let adaptations = adapted
        .needs
        .iter()
        .map(|(tag, profile)| AppliedAdaptation {
            need: tag.as_str().to_string(),
            features: profile.feature_names(),
        })
        .collect();

    let images: Vec<ResponseImage> = enriched.images.iter().map(ResponseImage::from).collect();
    let audio = audio.map(|bytes| base64::engine::general_purpose::STANDARD.encode(bytes));

    ResponseEnvelope {
        success: true,
        metadata: ResponseMetadata {
            adaptations,
            visual_support: !images.is_empty(),
            audio_support: audio.is_some(),
            content_type: "multimodal",
        },
        response: LearnResponse {
            text: enriched.text,
            images,
            audio,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "text": "Explain gravity",
            "userProfile": {
                "learningNeeds": ["dyslexia"],
                "culturalBackground": "X",
                "academicLevel": "basic",
                "interests": ["science"],
                "learningGoals": ["understand gravity"]
            }
        })
    }

    #[test]
    fn test_valid_request() {
        let request = validate_request(&valid_body()).unwrap();
        assert_eq!(request.text, "Explain gravity");
        assert_eq!(request.profile.learning_needs, vec!["dyslexia"]);
    }

    #[test]
    fn test_missing_text_and_profile_reported_together() {
        let err = validate_request(&json!({"text": "  "})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingInformation {
                text: Some("Text is required".to_string()),
                user_profile: Some("User profile is required".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_profile_only() {
        let err = validate_request(&json!({"text": "hi"})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingInformation {
                text: None,
                user_profile: Some("User profile is required".to_string()),
            }
        );
    }

    #[test]
    fn test_every_missing_field_listed() {
        let err = validate_request(&json!({
            "text": "hi",
            "userProfile": {"learningNeeds": [], "academicLevel": "basic", "interests": []}
        }))
        .unwrap_err();

        assert_eq!(
            err,
            ValidationError::IncompleteProfile {
                missing_fields: vec![
                    "learningNeeds".to_string(),
                    "culturalBackground".to_string(),
                    "learningGoals".to_string(),
                ],
            }
        );
    }

    #[test]
    fn test_mistyped_field_is_invalid_profile() {
        let mut body = valid_body();
        body["userProfile"]["interests"] = json!("science");
        assert!(matches!(
            validate_request(&body),
            Err(ValidationError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(LearnStage::Enriching.to_string(), "enriching");
        assert_eq!(
            LearnStage::Failed("generating".to_string()).to_string(),
            "failed(generating)"
        );
    }

    #[test]
    fn test_assemble_flags_follow_outputs() {
        let body = valid_body();
        let request = validate_request(&body).unwrap();
        let adapted = profile_adapter::adapt(&request.profile).unwrap();

        let envelope = assemble(
            &adapted,
            EnrichedContent {
                text: "t".to_string(),
                images: vec![],
            },
            Some(b"ID3".to_vec()),
        );

        assert!(!envelope.metadata.visual_support);
        assert!(envelope.metadata.audio_support);
        assert_eq!(envelope.response.audio.as_deref(), Some("SUQz"));
        assert_eq!(envelope.metadata.adaptations.len(), 1);
        assert_eq!(envelope.metadata.adaptations[0].need, "dyslexia");
        assert_eq!(envelope.metadata.adaptations[0].features.len(), 7);
    }
}
