//! GET /preview-images/:term

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::models::{retain_displayable, PreviewImagesResponse};
use crate::AppState;

/// Candidate images requested for a preview
pub const PREVIEW_IMAGE_LIMIT: usize = 5;

/// Look up displayable images for a single term
///
/// Lookup failures surface as 500 here, unlike enrichment where they are
/// absorbed.
pub async fn preview_images(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> ApiResult<Json<PreviewImagesResponse>> {
    let term = term.trim();
    if term.is_empty() {
        return Err(ApiError::BadRequest("term must not be empty".to_string()));
    }

    let candidates = state
        .images
        .search(term, PREVIEW_IMAGE_LIMIT)
        .await
        .map_err(|e| {
            warn!(term = term, provider = state.images.name(), error = %e, "Image preview failed");
            ApiError::from(e)
        })?;

    let images = retain_displayable(candidates);
    info!(term = term, images = images.len(), "Image preview");

    Ok(Json(PreviewImagesResponse {
        success: true,
        images,
    }))
}
