//! Image descriptors returned by the image-search service

use serde::{Deserialize, Serialize};

/// One illustrative image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub title: String,
    /// Source URL; empty when the service returned none
    pub url: String,
    pub description: Option<String>,
    pub license: Option<String>,
}

impl ImageDescriptor {
    /// Whether the image can be shown inline: it has a URL and is not SVG
    pub fn is_displayable(&self) -> bool {
        let url = self.url.trim();
        !url.is_empty() && !is_vector_graphic(url)
    }
}

fn is_vector_graphic(url: &str) -> bool {
    // Ignore query/fragment so "x.svg?width=800" is still caught
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_ascii_lowercase().ends_with(".svg")
}

/// Drop candidates without a usable URL or in a vector format
///
/// Idempotent: filtering an already-filtered list returns it unchanged.
pub fn retain_displayable(images: Vec<ImageDescriptor>) -> Vec<ImageDescriptor> {
    images.into_iter().filter(ImageDescriptor::is_displayable).collect()
}

/// Result of visual enrichment
#[derive(Debug, Clone, Default)]
pub struct EnrichedContent {
    /// Content text, possibly annotated with visual-aid markers
    pub text: String,
    /// Images in section-visitation order
    pub images: Vec<ImageDescriptor>,
}
