//! Tag catalog.

use axum::{extract::State, Json};
use galleria_core::{build_tag_catalog, MediaRepository, TagCategory};
use serde::Serialize;

use crate::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct TagCatalogResponse {
    pub data: Vec<TagCategory>,
}

/// Every tag category with its values and per-value media counts.
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<TagCatalogResponse>, ApiError> {
    let counts = state.repo.list_tag_counts().await?;
    Ok(Json(TagCatalogResponse {
        data: build_tag_catalog(counts),
    }))
}
