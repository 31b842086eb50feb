//! Data model for the content pipeline

pub mod adaptation;
pub mod envelope;
pub mod generation;
pub mod image;
pub mod profile;
pub mod speech;

pub use adaptation::{
    academic_framework, adaptation_profile, AcademicFramework, AdaptationProfile,
};
pub use envelope::{
    AppliedAdaptation, LearnResponse, PreviewImagesResponse, ResponseEnvelope, ResponseImage,
    ResponseMetadata,
};
pub use generation::{ChatRole, ChatTurn, GeneratedContent, GenerationParams, GenerationRequest};
pub use image::{retain_displayable, EnrichedContent, ImageDescriptor};
pub use profile::{AcademicLevel, LearnerProfile, NeedTag};
pub use speech::VoiceParameters;
