//! Voice-shaping parameters for speech synthesis

/// Voice parameters passed to the speech-synthesis service
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceParameters {
    /// Locale tag, e.g. "en-US"
    pub language_code: String,
    /// Speaking rate multiplier (1.0 = normal)
    pub speaking_rate: f32,
    /// Pitch offset in semitones
    pub pitch: f32,
    /// Volume gain in dB
    pub volume_gain_db: f32,
}

impl VoiceParameters {
    /// Neutral voice for `language_code`
    pub fn neutral(language_code: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            speaking_rate: 1.0,
            pitch: 0.0,
            volume_gain_db: 0.0,
        }
    }
}
