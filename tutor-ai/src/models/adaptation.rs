//! Static adaptation and academic-framework tables
//!
//! Both tables are built once on first access and are read-only for the
//! life of the process. Lookups hand out `&'static` references.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

use super::profile::{AcademicLevel, NeedTag};

/// Value carried by a content-style capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityValue {
    Enabled,
    Level(&'static str),
}

impl fmt::Display for CapabilityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityValue::Enabled => f.write_str("true"),
            CapabilityValue::Level(level) => f.write_str(level),
        }
    }
}

/// One named content-style capability
#[derive(Debug, Clone, Copy)]
pub struct Capability {
    pub name: &'static str,
    pub value: CapabilityValue,
}

const fn enabled(name: &'static str) -> Capability {
    Capability {
        name,
        value: CapabilityValue::Enabled,
    }
}

/// Content adaptation for one learning need
#[derive(Debug, Clone)]
pub struct AdaptationProfile {
    /// Content-style capabilities, in presentation order
    pub content_style: Vec<Capability>,
    /// Pacing descriptor
    pub pacing: &'static str,
    pub repetition: bool,
    pub break_frequency: Option<&'static str>,
    pub audio_detail: Option<&'static str>,
    /// Responses for this need are enriched with images
    pub visual_support: bool,
    /// Responses for this need carry synthesized narration
    pub audio_support: bool,
    pub language_support: bool,
}

impl AdaptationProfile {
    /// Capability names, in presentation order
    pub fn feature_names(&self) -> Vec<String> {
        self.content_style.iter().map(|c| c.name.to_string()).collect()
    }
}

/// Pacing and assessment descriptor for one academic level
#[derive(Debug, Clone)]
pub struct AcademicFramework {
    pub structure: &'static str,
    pub assessment: &'static str,
    pub pacing: &'static str,
    pub support: &'static str,
    pub evaluation_method: &'static str,
    pub teaching_style: &'static str,
}

static ADAPTATION_PROFILES: Lazy<HashMap<NeedTag, AdaptationProfile>> = Lazy::new(|| {
    let mut profiles = HashMap::new();

    profiles.insert(
        NeedTag::Dyslexia,
        AdaptationProfile {
            content_style: vec![
                enabled("textFormatting"),
                enabled("simplifiedContent"),
                Capability {
                    name: "chunkingStrategy",
                    value: CapabilityValue::Level("basic"),
                },
                enabled("audioSupport"),
                enabled("visualAids"),
                enabled("adaptiveLearning"),
                enabled("multimodalContent"),
            ],
            pacing: "flexible",
            repetition: true,
            break_frequency: None,
            audio_detail: None,
            visual_support: true,
            audio_support: true,
            language_support: false,
        },
    );

    profiles.insert(
        NeedTag::Adhd,
        AdaptationProfile {
            content_style: vec![
                enabled("shortLessons"),
                enabled("structuredTasks"),
                enabled("minimalDistractions"),
                enabled("visualTimers"),
                enabled("progressChecks"),
                enabled("gamification"),
                enabled("interactiveTasks"),
            ],
            pacing: "dynamic",
            repetition: false,
            break_frequency: Some("high"),
            audio_detail: None,
            visual_support: true,
            audio_support: false,
            language_support: false,
        },
    );

    profiles.insert(
        NeedTag::VisualImpairment,
        AdaptationProfile {
            content_style: vec![
                enabled("highContrast"),
                enabled("textDescriptions"),
                enabled("audioTranscripts"),
                enabled("screenReaderOpt"),
                enabled("audioLessons"),
                enabled("fullAccessibility"),
            ],
            pacing: "self-directed",
            repetition: false,
            break_frequency: None,
            audio_detail: Some("high"),
            visual_support: false,
            audio_support: true,
            language_support: false,
        },
    );

    profiles.insert(
        NeedTag::LanguageLearner,
        AdaptationProfile {
            content_style: vec![
                enabled("simplifiedText"),
                enabled("vocabularyFocus"),
                enabled("bilingualContent"),
                enabled("practiceExercises"),
                enabled("culturalNotes"),
                enabled("immersiveLearning"),
            ],
            pacing: "gradual",
            repetition: false,
            break_frequency: None,
            audio_detail: None,
            visual_support: true,
            audio_support: false,
            language_support: true,
        },
    );

    profiles
});

static ACADEMIC_FRAMEWORKS: Lazy<HashMap<AcademicLevel, AcademicFramework>> = Lazy::new(|| {
    HashMap::from([
        (
            AcademicLevel::Basic,
            AcademicFramework {
                structure: "fundamental",
                assessment: "progress-based",
                pacing: "flexible",
                support: "community-based",
                evaluation_method: "continuous",
                teaching_style: "hands-on",
            },
        ),
        (
            AcademicLevel::Standard,
            AcademicFramework {
                structure: "grade-based",
                assessment: "regular",
                pacing: "structured",
                support: "teacher-guided",
                evaluation_method: "mixed",
                teaching_style: "balanced",
            },
        ),
        (
            AcademicLevel::Advanced,
            AcademicFramework {
                structure: "comprehensive",
                assessment: "continuous",
                pacing: "adaptive",
                support: "multi-modal",
                evaluation_method: "diverse",
                teaching_style: "investigative",
            },
        ),
    ])
});

/// Adaptation profile for a need tag
///
/// Every `NeedTag` variant has an entry, so this never misses.
pub fn adaptation_profile(tag: NeedTag) -> &'static AdaptationProfile {
    &ADAPTATION_PROFILES[&tag]
}

/// Academic framework for a level
pub fn academic_framework(level: AcademicLevel) -> &'static AcademicFramework {
    &ACADEMIC_FRAMEWORKS[&level]
}
