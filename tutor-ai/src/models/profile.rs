//! Learner profile and its enumerations
//!
//! The profile arrives from the caller as loosely-typed JSON. Need tags and
//! the academic level stay as strings here and are resolved into
//! [`NeedTag`] / [`AcademicLevel`] by the profile adapter, which reports
//! unknown values as validation errors.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Locale used when the profile does not carry one
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Learner profile supplied with every `/learn` request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    /// Declared learning needs (raw tags, resolved by the profile adapter)
    pub learning_needs: Vec<String>,
    /// Free-text cultural background
    pub cultural_background: String,
    /// Academic level (raw, resolved by the profile adapter)
    pub academic_level: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub learning_goals: Vec<String>,
    /// Locale tag used for speech synthesis; absent, null or blank means
    /// [`DEFAULT_LANGUAGE`]
    #[serde(default = "default_language", deserialize_with = "language_or_default")]
    pub language_preference: String,
    /// Absent or null means none
    #[serde(default, deserialize_with = "null_as_default")]
    pub community_resources: Vec<String>,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Accept an explicit `null` the same way as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn language_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|lang| lang.trim().to_string())
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(default_language))
}

/// Known learning-need tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeedTag {
    Dyslexia,
    /// Attention support
    Adhd,
    VisualImpairment,
    LanguageLearner,
}

impl NeedTag {
    pub const ALL: [NeedTag; 4] = [
        NeedTag::Dyslexia,
        NeedTag::Adhd,
        NeedTag::VisualImpairment,
        NeedTag::LanguageLearner,
    ];

    /// Wire name used in requests and response metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            NeedTag::Dyslexia => "dyslexia",
            NeedTag::Adhd => "adhd",
            NeedTag::VisualImpairment => "visualImpairment",
            NeedTag::LanguageLearner => "languageLearner",
        }
    }
}

impl fmt::Display for NeedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NeedTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NeedTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Academic level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcademicLevel {
    Basic,
    Standard,
    Advanced,
}

impl AcademicLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcademicLevel::Basic => "basic",
            AcademicLevel::Standard => "standard",
            AcademicLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for AcademicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AcademicLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(AcademicLevel::Basic),
            "standard" => Ok(AcademicLevel::Standard),
            "advanced" => Ok(AcademicLevel::Advanced),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_need_tag_wire_names_roundtrip() {
        for tag in NeedTag::ALL {
            assert_eq!(tag.as_str().parse::<NeedTag>(), Ok(tag));
        }
        assert!("dyslexia-support".parse::<NeedTag>().is_err());
    }

    #[test]
    fn test_academic_level_parse() {
        assert_eq!("basic".parse(), Ok(AcademicLevel::Basic));
        assert_eq!("advanced".parse(), Ok(AcademicLevel::Advanced));
        assert!("Basic".parse::<AcademicLevel>().is_err());
    }

    #[test]
    fn test_profile_defaults() {
        let profile: LearnerProfile = serde_json::from_value(serde_json::json!({
            "learningNeeds": ["dyslexia"],
            "culturalBackground": "X",
            "academicLevel": "basic",
            "interests": ["science"],
            "learningGoals": ["understand gravity"]
        }))
        .unwrap();

        assert_eq!(profile.language_preference, DEFAULT_LANGUAGE);
        assert!(profile.community_resources.is_empty());
    }

    #[test]
    fn test_null_optional_fields_use_defaults() {
        let profile: LearnerProfile = serde_json::from_value(serde_json::json!({
            "learningNeeds": ["adhd"],
            "culturalBackground": "X",
            "academicLevel": "basic",
            "interests": ["science"],
            "learningGoals": ["understand gravity"],
            "languagePreference": null,
            "communityResources": null
        }))
        .unwrap();

        assert_eq!(profile.language_preference, DEFAULT_LANGUAGE);
        assert!(profile.community_resources.is_empty());
    }

    #[test]
    fn test_explicit_optional_fields_kept() {
        let profile: LearnerProfile = serde_json::from_value(serde_json::json!({
            "learningNeeds": ["adhd"],
            "culturalBackground": "X",
            "academicLevel": "basic",
            "interests": [],
            "learningGoals": [],
            "languagePreference": " fr-FR ",
            "communityResources": ["library"]
        }))
        .unwrap();

        assert_eq!(profile.language_preference, "fr-FR");
        assert_eq!(profile.community_resources, vec!["library"]);

        let blank: LearnerProfile = serde_json::from_value(serde_json::json!({
            "learningNeeds": ["adhd"],
            "culturalBackground": "X",
            "academicLevel": "basic",
            "interests": [],
            "learningGoals": [],
            "languagePreference": ""
        }))
        .unwrap();
        assert_eq!(blank.language_preference, DEFAULT_LANGUAGE);
    }
}
