//! Content pipeline services
//!
//! Profile adaptation and the three content stages, sequenced by the
//! learn orchestrator.

pub mod content_generator;
pub mod learn_orchestrator;
pub mod profile_adapter;
pub mod speech_synthesizer;
pub mod visual_enrichment;

pub use content_generator::ContentGenerator;
pub use learn_orchestrator::{validate_request, LearnOrchestrator, LearnRequest, LearnStage};
pub use profile_adapter::{adapt, AdaptedProfile};
pub use speech_synthesizer::SpeechSynthesizer;
pub use visual_enrichment::VisualEnrichment;
