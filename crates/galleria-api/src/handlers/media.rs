//! Single media item lookup.

use axum::{
    extract::{Path, State},
    Json,
};
use galleria_core::MediaItem;

use crate::{ApiError, AppState};

/// Get one media item with its tags grouped by category.
///
/// # Returns
/// - 200 OK with the item
/// - 404 Not Found if no item has this id
pub async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MediaItem>, ApiError> {
    let item = state.feed.get_item(&id).await?;
    Ok(Json(item))
}
