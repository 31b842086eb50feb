//! Visual Enrichment Engine
//!
//! Walks the generated text section by section, looks up an image for the
//! first key term each section mentions, and interleaves visual-aid markers.
//!
//! Matching is a case-insensitive substring test; the earliest term in
//! extraction order wins. Images are not deduplicated across sections, so a
//! term mentioned in several sections can contribute the same image more
//! than once.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::ImageSearch;
use crate::models::{
    adaptation_profile, retain_displayable, EnrichedContent, ImageDescriptor, NeedTag,
};

/// Separator between content sections
pub const SECTION_SEPARATOR: &str = "\n\n";

/// Candidate images requested per matched section
pub const SECTION_IMAGE_LIMIT: usize = 3;

const MARKER_PREFIX: &str = "[Visual Aid: ";

/// Whether any declared need's adaptation profile asks for images
pub fn needs_visual_support(needs: &[NeedTag]) -> bool {
    needs.iter().any(|n| adaptation_profile(*n).visual_support)
}

/// Inline marker naming an enrichment image
pub fn visual_aid_marker(title: &str) -> String {
    format!("{}{}]", MARKER_PREFIX, title)
}

/// First term (in extraction order) contained in `section`, ignoring case
pub fn first_matching_term<'t>(section: &str, terms: &'t [String]) -> Option<&'t str> {
    let haystack = section.to_lowercase();
    terms
        .iter()
        .find(|term| haystack.contains(&term.to_lowercase()))
        .map(String::as_str)
}

/// Remove visual-aid marker sections, recovering the original text
///
/// Any section shaped like a marker is removed, including one the model
/// wrote itself, so the round trip is exact only for text without such
/// sections.
pub fn strip_visual_aid_markers(text: &str) -> String {
    text.split(SECTION_SEPARATOR)
        .filter(|section| !(section.starts_with(MARKER_PREFIX) && section.ends_with(']')))
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

/// Section-level image enrichment
pub struct VisualEnrichment {
    images: Arc<dyn ImageSearch>,
}

impl VisualEnrichment {
    pub fn new(images: Arc<dyn ImageSearch>) -> Self {
        Self { images }
    }

    /// Enrich `text` with images for `terms`
    ///
    /// Returns the text unchanged, without any lookups, when no declared need
    /// calls for visual support. Lookup failures count as zero images.
    pub async fn enrich(&self, text: &str, terms: &[String], needs: &[NeedTag]) -> EnrichedContent {
        if !needs_visual_support(needs) {
            return EnrichedContent {
                text: text.to_string(),
                images: Vec::new(),
            };
        }

        let mut sections: Vec<String> = Vec::new();
        let mut images: Vec<ImageDescriptor> = Vec::new();

        for section in text.split(SECTION_SEPARATOR) {
            sections.push(section.to_string());

            let Some(term) = first_matching_term(section, terms) else {
                continue;
            };

            let found = self.lookup(term).await;
            if let Some(first) = found.first() {
                sections.push(visual_aid_marker(&first.title));
                images.extend(found);
            }
        }

        debug!(
            sections = sections.len(),
            images = images.len(),
            "Visual enrichment complete"
        );

        EnrichedContent {
            text: sections.join(SECTION_SEPARATOR),
            images,
        }
    }

    /// Filtered images for one term; failures are logged and yield none
    async fn lookup(&self, term: &str) -> Vec<ImageDescriptor> {
        match self.images.search(term, SECTION_IMAGE_LIMIT).await {
            Ok(candidates) => retain_displayable(candidates),
            Err(e) => {
                warn!(
                    term = term,
                    provider = self.images.name(),
                    error = %e,
                    "Image lookup failed; continuing without images"
                );
                Vec::new()
            }
        }
    }
}
