//! Profile Adapter
//!
//! Maps a learner profile onto the static adaptation tables and renders the
//! system directive sent to the language model. Pure: no I/O, no state.

use std::fmt;

use crate::error::ValidationError;
use crate::models::{
    academic_framework, adaptation_profile, AcademicFramework, AcademicLevel, AdaptationProfile,
    LearnerProfile, NeedTag,
};

/// A learner profile resolved against the adaptation tables
#[derive(Debug, Clone)]
pub struct AdaptedProfile<'a> {
    pub profile: &'a LearnerProfile,
    /// One entry per declared need, in declaration order
    pub needs: Vec<(NeedTag, &'static AdaptationProfile)>,
    pub academic_level: AcademicLevel,
    pub framework: &'static AcademicFramework,
    pub system_directive: String,
}

impl AdaptedProfile<'_> {
    pub fn need_tags(&self) -> Vec<NeedTag> {
        self.needs.iter().map(|(tag, _)| *tag).collect()
    }

    pub fn has_need(&self, tag: NeedTag) -> bool {
        self.needs.iter().any(|(t, _)| *t == tag)
    }
}

/// Resolve need tags, reporting every unknown tag at once
pub fn resolve_needs(raw: &[String]) -> Result<Vec<NeedTag>, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::InvalidProfile(
            "learningNeeds must contain at least one need".to_string(),
        ));
    }

    let mut needs = Vec::with_capacity(raw.len());
    let mut unknown = Vec::new();
    for tag in raw {
        match tag.parse::<NeedTag>() {
            Ok(need) => needs.push(need),
            Err(bad) => unknown.push(format!("'{}'", bad)),
        }
    }

    if !unknown.is_empty() {
        let known: Vec<_> = NeedTag::ALL.iter().map(NeedTag::as_str).collect();
        return Err(ValidationError::InvalidProfile(format!(
            "Unknown learning need(s) {} (expected one of: {})",
            unknown.join(", "),
            known.join(", ")
        )));
    }

    Ok(needs)
}

/// Resolve a profile into adaptation profiles, framework and directive
pub fn adapt(profile: &LearnerProfile) -> Result<AdaptedProfile<'_>, ValidationError> {
    let tags = resolve_needs(&profile.learning_needs)?;

    let academic_level: AcademicLevel = profile.academic_level.parse().map_err(|bad| {
        ValidationError::InvalidProfile(format!(
            "Unknown academicLevel '{}' (expected one of: basic, standard, advanced)",
            bad
        ))
    })?;

    let needs: Vec<_> = tags.into_iter().map(|t| (t, adaptation_profile(t))).collect();
    let framework = academic_framework(academic_level);
    let system_directive = render_directive(profile, &needs, academic_level, framework);

    Ok(AdaptedProfile {
        profile,
        needs,
        academic_level,
        framework,
        system_directive,
    })
}

/// Render the tutor system directive
///
/// Layout: learning adaptations (one block per need), cultural context,
/// academic framework, personalization, then fixed teaching guidance.
pub fn render_directive(
    profile: &LearnerProfile,
    needs: &[(NeedTag, &'static AdaptationProfile)],
    level: AcademicLevel,
    framework: &AcademicFramework,
) -> String {
    SystemDirective {
        profile,
        needs,
        level,
        framework,
    }
    .to_string()
}

/// Borrowed view over everything the directive mentions
struct SystemDirective<'a> {
    profile: &'a LearnerProfile,
    needs: &'a [(NeedTag, &'static AdaptationProfile)],
    level: AcademicLevel,
    framework: &'a AcademicFramework,
}

impl SystemDirective<'_> {
    fn write_adaptations(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LEARNING ADAPTATIONS:")?;
        for (tag, adaptation) in self.needs {
            writeln!(f, "\n{} Accommodations:", tag.as_str().to_uppercase())?;
            for capability in &adaptation.content_style {
                writeln!(f, "- {}: {}", capability.name, capability.value)?;
            }
            writeln!(f, "Pacing: {}", adaptation.pacing)?;
            if adaptation.repetition {
                writeln!(f, "Repetition: reinforce key points")?;
            }
            if let Some(frequency) = adaptation.break_frequency {
                writeln!(f, "Break frequency: {}", frequency)?;
            }
            if let Some(detail) = adaptation.audio_detail {
                writeln!(f, "Audio detail: {}", detail)?;
            }
            if adaptation.language_support {
                writeln!(f, "Language support: explain vocabulary and cultural references")?;
            }
        }
        Ok(())
    }

    fn write_context(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = self.profile;
        let framework = self.framework;

        writeln!(f, "\nCULTURAL CONTEXT:")?;
        writeln!(f, "- Background: {}", profile.cultural_background)?;
        writeln!(f, "- Language: {}", profile.language_preference)?;
        writeln!(f, "- Community Resources: {}", profile.community_resources.join(", "))?;

        writeln!(f, "\nACADEMIC FRAMEWORK:")?;
        writeln!(f, "- Level: {}", self.level)?;
        writeln!(f, "- Structure: {}", framework.structure)?;
        writeln!(f, "- Assessment: {}", framework.assessment)?;
        writeln!(f, "- Pacing: {}", framework.pacing)?;
        writeln!(f, "- Teaching Style: {}", framework.teaching_style)?;
        writeln!(f, "- Support System: {}", framework.support)?;
        writeln!(f, "- Evaluation: {}", framework.evaluation_method)?;

        writeln!(f, "\nPERSONALIZATION:")?;
        writeln!(f, "- Interests: {}", profile.interests.join(", "))?;
        writeln!(f, "- Learning Goals: {}", profile.learning_goals.join(", "))
    }
}

impl fmt::Display for SystemDirective<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("You are an adaptive AI tutor specialized in personalized education.\n\n")?;
        self.write_adaptations(f)?;
        self.write_context(f)?;
        f.write_str(TEACHING_GUIDANCE)
    }
}

const TEACHING_GUIDANCE: &str = "\nTEACHING APPROACH:\n\
    1. Use culturally relevant examples\n\
    2. Focus on practical applications\n\
    3. Include community-based learning\n\
    4. Provide multiple explanation approaches\n\
    5. Adapt to learning needs\n\
    \nRESPONSE GUIDELINES:\n\
    1. Maintain clear structure\n\
    2. Include practical exercises\n\
    3. Provide concrete examples\n\
    4. Include collaborative activities\n\
    5. Support various learning styles\n\
    \nCONTENT STRUCTURING:\n\
    1. Break into manageable segments\n\
    2. Include clear summaries\n\
    3. Provide practice materials\n\
    4. Support group learning activities\n\
    5. Enable progress tracking\n";
