//! `/learn` and `/preview-images` response bodies

use serde::Serialize;

use super::image::ImageDescriptor;

/// Successful `/learn` response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub success: bool,
    pub response: LearnResponse,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearnResponse {
    pub text: String,
    pub images: Vec<ResponseImage>,
    /// Base64-encoded MP3, or null when no audio was produced
    pub audio: Option<String>,
}

/// Image as exposed in `/learn` responses (no license field)
#[derive(Debug, Clone, Serialize)]
pub struct ResponseImage {
    pub url: String,
    pub description: Option<String>,
    pub title: String,
}

impl From<&ImageDescriptor> for ResponseImage {
    fn from(image: &ImageDescriptor) -> Self {
        Self {
            url: image.url.clone(),
            description: image.description.clone(),
            title: image.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub adaptations: Vec<AppliedAdaptation>,
    pub visual_support: bool,
    pub audio_support: bool,
    pub content_type: &'static str,
}

/// One declared need and the capabilities its adaptation profile applies
#[derive(Debug, Clone, Serialize)]
pub struct AppliedAdaptation {
    #[serde(rename = "type")]
    pub need: String,
    pub features: Vec<String>,
}

/// Successful `/preview-images/:term` response
#[derive(Debug, Clone, Serialize)]
pub struct PreviewImagesResponse {
    pub success: bool,
    pub images: Vec<ImageDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serializes_camel_case() {
        let envelope = ResponseEnvelope {
            success: true,
            response: LearnResponse {
                text: "t".to_string(),
                images: vec![],
                audio: None,
            },
            metadata: ResponseMetadata {
                adaptations: vec![AppliedAdaptation {
                    need: "dyslexia".to_string(),
                    features: vec!["textFormatting".to_string()],
                }],
                visual_support: false,
                audio_support: false,
                content_type: "multimodal",
            },
        };

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["response"]["audio"], serde_json::Value::Null);
        assert_eq!(json["metadata"]["adaptations"][0]["type"], "dyslexia");
        assert_eq!(json["metadata"]["visualSupport"], false);
        assert_eq!(json["metadata"]["contentType"], "multimodal");
    }
}
