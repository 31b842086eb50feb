//! Content Generator
//!
//! Two dependent exchanges on one conversation:
//! 1. directive + topic → tutoring text
//! 2. same conversation + extraction prompt → 3 to 5 key terms
//!
//! Either exchange failing fails the whole operation; no partial text escapes.

use std::sync::Arc;
use tracing::{debug, info};

use crate::clients::LanguageModel;
use crate::error::GenerationError;
use crate::models::{ChatTurn, GeneratedContent, GenerationParams, GenerationRequest, NeedTag};
use crate::services::profile_adapter::AdaptedProfile;

/// Select sampling parameters by need precedence
///
/// Dyslexia first, then language learner, then defaults. First match wins,
/// so a profile declaring both gets the tighter dyslexia values.
pub fn configure_generation(needs: &[NeedTag]) -> GenerationParams {
    if needs.contains(&NeedTag::Dyslexia) {
        GenerationParams::DYSLEXIA
    } else if needs.contains(&NeedTag::LanguageLearner) {
        GenerationParams::LANGUAGE_LEARNER
    } else {
        GenerationParams::DEFAULT
    }
}

/// User turn for the first exchange
pub fn topic_message(topic: &str, adapted: &AdaptedProfile<'_>) -> String {
    let profile = adapted.profile;
    let needs: Vec<_> = adapted.needs.iter().map(|(t, _)| t.as_str()).collect();

    format!(
        "Question/Topic: {topic}\n\n\
         Please provide a response that:\n\
         1. Uses examples relevant to {culture}\n\
         2. Supports {needs} learning needs\n\
         3. Connects to student interests: {interests}\n\
         4. Aligns with {level} academic level\n\
         5. Incorporates cultural context and understanding\n\
         6. Provides practical applications and examples\n\
         7. Includes collaborative learning opportunities\n\
         8. Supports multiple learning styles",
        topic = topic,
        culture = profile.cultural_background,
        needs = needs.join(", "),
        interests = profile.interests.join(", "),
        level = adapted.academic_level,
    )
}

/// User turn for the key-term exchange
pub fn key_terms_prompt(text: &str) -> String {
    format!(
        "Extract 3-5 key terms or concepts from this text that would benefit from visual \
         representation. Reply with one term per line and nothing else:\n{}",
        text
    )
}

/// Parse the key-term reply into a list
///
/// One term per line, trimmed; list markers and bold markup are removed and
/// blank lines dropped.
pub fn parse_key_terms(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(|line| strip_list_marker(line.trim()).trim_matches('*').trim().to_string())
        .filter(|term| !term.is_empty())
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    for bullet in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return rest;
        }
    }

    // "1. term" / "12) term"
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest;
        }
    }

    line
}

/// Drives the two-stage generation against a language model
pub struct ContentGenerator {
    model: Arc<dyn LanguageModel>,
}

impl ContentGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Generate tutoring text and its key terms
    pub async fn generate(
        &self,
        topic: &str,
        adapted: &AdaptedProfile<'_>,
    ) -> Result<GeneratedContent, GenerationError> {
        let params = configure_generation(&adapted.need_tags());
        let mut request = GenerationRequest {
            system_directive: adapted.system_directive.clone(),
            params,
            turns: vec![ChatTurn::user(topic_message(topic, adapted))],
        };

        debug!(
            provider = self.model.name(),
            temperature = params.temperature,
            max_output_tokens = params.max_output_tokens,
            "Generating tutoring content"
        );

        // Stage 1: content
        let text = self
            .model
            .complete(&request)
            .await
            .map_err(GenerationError::Content)?;

        // Stage 2: key terms, on the same conversation
        request.turns.push(ChatTurn::model(text.clone()));
        request.turns.push(ChatTurn::user(key_terms_prompt(&text)));

        let reply = self
            .model
            .complete(&request)
            .await
            .map_err(GenerationError::KeyTerms)?;
        let key_terms = parse_key_terms(&reply);

        info!(
            chars = text.len(),
            key_terms = key_terms.len(),
            "Generated tutoring content"
        );

        Ok(GeneratedContent { text, key_terms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ClientError;
    use crate::models::{ChatRole, LearnerProfile};
    use crate::services::profile_adapter::adapt;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays canned replies and records every request
    struct ScriptedModel {
        replies: Mutex<Vec<Result<String, ClientError>>>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<String, ClientError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn complete(&self, request: &GenerationRequest) -> Result<String, ClientError> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(ClientError::EmptyResponse("script exhausted".into())))
        }
    }

    fn profile(needs: &[&str]) -> LearnerProfile {
        LearnerProfile {
            learning_needs: needs.iter().map(|s| s.to_string()).collect(),
            cultural_background: "X".to_string(),
            academic_level: "basic".to_string(),
            interests: vec!["science".to_string()],
            learning_goals: vec!["understand gravity".to_string()],
            language_preference: "en-US".to_string(),
            community_resources: vec![],
        }
    }

    #[test]
    fn test_precedence_dyslexia_dominates() {
        let both = [NeedTag::LanguageLearner, NeedTag::Dyslexia];
        assert_eq!(configure_generation(&both), GenerationParams::DYSLEXIA);

        let both = [NeedTag::Dyslexia, NeedTag::LanguageLearner];
        assert_eq!(configure_generation(&both), GenerationParams::DYSLEXIA);
    }

    #[test]
    fn test_language_learner_and_default() {
        assert_eq!(
            configure_generation(&[NeedTag::LanguageLearner, NeedTag::Adhd]),
            GenerationParams::LANGUAGE_LEARNER
        );
        assert_eq!(
            configure_generation(&[NeedTag::VisualImpairment]),
            GenerationParams::DEFAULT
        );
    }

    #[test]
    fn test_parse_key_terms() {
        let reply = "  Gravity \n\n- Mass\n2. Orbit\n3) Free fall\n**Newton**\n   \n";
        assert_eq!(
            parse_key_terms(reply),
            vec!["Gravity", "Mass", "Orbit", "Free fall", "Newton"]
        );
    }

    #[test]
    fn test_parse_key_terms_keeps_numbers_inside_terms() {
        assert_eq!(parse_key_terms("3D printing\n1990s"), vec!["3D printing", "1990s"]);
    }

    #[tokio::test]
    async fn test_generate_runs_two_exchanges_on_one_conversation() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok("Gravity pulls objects.\n\nThe Moon orbits.".to_string()),
            Ok("Gravity\nMoon\n".to_string()),
        ]));
        let generator = ContentGenerator::new(model.clone());
        let p = profile(&["dyslexia"]);
        let adapted = adapt(&p).unwrap();

        let content = generator.generate("Explain gravity", &adapted).await.unwrap();
        assert_eq!(content.text, "Gravity pulls objects.\n\nThe Moon orbits.");
        assert_eq!(content.key_terms, vec!["Gravity", "Moon"]);

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].turns.len(), 1);
        assert!(seen[0].turns[0].text.contains("Question/Topic: Explain gravity"));
        assert_eq!(seen[0].params, GenerationParams::DYSLEXIA);

        let second = &seen[1].turns;
        assert_eq!(second.len(), 3);
        assert_eq!(second[1].role, ChatRole::Model);
        assert_eq!(second[1].text, content.text);
        assert!(second[2].text.starts_with("Extract 3-5 key terms"));
    }

    #[tokio::test]
    async fn test_second_exchange_failure_returns_no_text() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok("Some text".to_string()),
            Err(ClientError::NetworkError("reset".to_string())),
        ]));
        let generator = ContentGenerator::new(model);
        let p = profile(&["adhd"]);
        let adapted = adapt(&p).unwrap();

        let err = generator.generate("topic", &adapted).await.unwrap_err();
        assert!(matches!(err, GenerationError::KeyTerms(_)));
    }

    #[tokio::test]
    async fn test_first_exchange_failure_skips_second() {
        let model = Arc::new(ScriptedModel::new(vec![Err(ClientError::ApiError(
            500,
            "boom".to_string(),
        ))]));
        let generator = ContentGenerator::new(model.clone());
        let p = profile(&["adhd"]);
        let adapted = adapt(&p).unwrap();

        let err = generator.generate("topic", &adapted).await.unwrap_err();
        assert!(matches!(err, GenerationError::Content(_)));
        assert_eq!(model.seen.lock().unwrap().len(), 1);
    }
}
