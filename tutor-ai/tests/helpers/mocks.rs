//! In-process fakes for the outbound service traits
//!
//! Each fake counts its calls so tests can assert that a stage was skipped.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tutor_ai::clients::{ClientError, ImageSearch, LanguageModel, SpeechSynthesis};
use tutor_ai::models::{GenerationRequest, ImageDescriptor, VoiceParameters};

pub const GENERATED_TEXT: &str = "Gravity is the force that pulls objects together.\n\n\
     Every object with mass attracts every other object.\n\n\
     The Moon stays in orbit because of gravity.";

pub const KEY_TERMS_REPLY: &str = "Gravity\nMass\nOrbit";

/// Language model that answers the content turn and the key-term turn
pub struct MockModel {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    pub last_temperature: Mutex<Option<f32>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            last_temperature: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn name(&self) -> &'static str {
        "mock-model"
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_temperature.lock().unwrap() = Some(request.params.temperature);

        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::ApiError(503, "model overloaded".to_string()));
        }

        let extracting = request
            .turns
            .last()
            .map(|t| t.text.starts_with("Extract"))
            .unwrap_or(false);
        if extracting {
            Ok(KEY_TERMS_REPLY.to_string())
        } else {
            Ok(GENERATED_TEXT.to_string())
        }
    }
}

/// Image search returning one vector and two raster candidates per term
pub struct MockImages {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    pub limits: Mutex<Vec<usize>>,
}

impl MockImages {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            limits: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSearch for MockImages {
    fn name(&self) -> &'static str {
        "mock-images"
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<ImageDescriptor>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.limits.lock().unwrap().push(limit);

        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::NetworkError("connection refused".to_string()));
        }

        let slug = term.to_lowercase().replace(' ', "_");
        let candidates = vec![
            ImageDescriptor {
                title: format!("File:{} diagram.svg", term),
                url: format!("https://upload.test/{}.SVG?width=800", slug),
                description: None,
                license: Some("CC BY-SA 4.0".to_string()),
            },
            ImageDescriptor {
                title: format!("File:{} photo.jpg", term),
                url: format!("https://upload.test/{}.jpg", slug),
                description: Some(format!("A photo of {}", term)),
                license: Some("CC0".to_string()),
            },
            ImageDescriptor {
                title: format!("File:{} chart.png", term),
                url: format!("https://upload.test/{}.png", slug),
                description: None,
                license: None,
            },
        ];

        Ok(candidates.into_iter().take(limit).collect())
    }
}

/// Speech synthesizer returning a fixed MP3 header
pub struct MockSpeech {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    pub last_voice: Mutex<Option<VoiceParameters>>,
}

impl MockSpeech {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            last_voice: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub const MOCK_AUDIO: &[u8] = b"ID3\x03";

#[async_trait]
impl SpeechSynthesis for MockSpeech {
    fn name(&self) -> &'static str {
        "mock-speech"
    }

    async fn synthesize(
        &self,
        _text: &str,
        voice: &VoiceParameters,
    ) -> Result<Vec<u8>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_voice.lock().unwrap() = Some(voice.clone());

        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::MissingApiKey("speech"));
        }
        Ok(MOCK_AUDIO.to_vec())
    }
}
