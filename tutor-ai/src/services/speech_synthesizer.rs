//! Speech Synthesizer
//!
//! Voice parameters are layered in a fixed order: dyslexia adjustments,
//! then visual-impairment adjustments. When both apply, fields set by the
//! later rule win (speaking rate ends up at the visual-impairment value).

use std::sync::Arc;
use tracing::info;

use crate::clients::SpeechSynthesis;
use crate::error::SynthesisError;
use crate::models::{adaptation_profile, NeedTag, VoiceParameters};

/// Whether any declared need's adaptation profile asks for audio
pub fn needs_audio_support(needs: &[NeedTag]) -> bool {
    needs.iter().any(|n| adaptation_profile(*n).audio_support)
}

/// Derive voice parameters for `needs`, spoken in `language_code`
pub fn voice_parameters(needs: &[NeedTag], language_code: &str) -> VoiceParameters {
    let mut voice = VoiceParameters::neutral(language_code);

    if needs.contains(&NeedTag::Dyslexia) {
        voice.speaking_rate = 0.85;
        voice.pitch = -1.0;
    }

    if needs.contains(&NeedTag::VisualImpairment) {
        voice.speaking_rate = 0.95;
        voice.volume_gain_db = 1.0;
    }

    voice
}

pub struct SpeechSynthesizer {
    speech: Arc<dyn SpeechSynthesis>,
}

impl SpeechSynthesizer {
    pub fn new(speech: Arc<dyn SpeechSynthesis>) -> Self {
        Self { speech }
    }

    /// Synthesize `text` when the needs call for audio
    ///
    /// `Ok(None)` means audio does not apply; no call is made.
    pub async fn synthesize(
        &self,
        text: &str,
        needs: &[NeedTag],
        language_code: &str,
    ) -> Result<Option<Vec<u8>>, SynthesisError> {
        if !needs_audio_support(needs) {
            return Ok(None);
        }

        let voice = voice_parameters(needs, language_code);
        let audio = self.speech.synthesize(text, &voice).await?;

        info!(
            provider = self.speech.name(),
            bytes = audio.len(),
            rate = voice.speaking_rate,
            "Synthesized speech"
        );

        Ok(Some(audio))
    }
}
