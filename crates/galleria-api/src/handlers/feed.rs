//! Feed and tag search handlers.
//!
//! Both endpoints share the query shape `?cursor=&limit=&type=&tags=` and
//! return `{ data, nextCursor }`; search adds `totalMatches`. A repeated
//! parameter keeps its first value.

use axum::{extract::State, Json};
use galleria_core::FeedResponse;

use crate::{query_types::FeedQuery, ApiError, AppState};

/// Newest-first media feed.
///
/// # Query Parameters
/// - `cursor`: `nextCursor` from the previous page; malformed values restart from the top
/// - `limit`: page size, clamped to 1..=100 (default 20)
/// - `type`: `image` or `video`; other values are ignored
/// - `tags`: comma-separated values an item must all carry (optional)
///
/// # Returns
/// - 200 OK with `{ data, nextCursor }`
/// - 500 Internal Server Error if the store fails
pub async fn get_feed(
    State(state): State<AppState>,
    FeedQuery(params): FeedQuery,
) -> Result<Json<FeedResponse>, ApiError> {
    let page = state.feed.feed(params.into_request()).await?;
    Ok(Json(page))
}

/// Tag search.
///
/// Same parameters as [`get_feed`], but `tags` is required and each item
/// carries its tags grouped by category.
///
/// # Returns
/// - 200 OK with `{ data, nextCursor, totalMatches }`
/// - 400 Bad Request if `tags` is missing or empty
/// - 500 Internal Server Error if the store fails
pub async fn search_media(
    State(state): State<AppState>,
    FeedQuery(params): FeedQuery,
) -> Result<Json<FeedResponse>, ApiError> {
    let page = state.feed.search(params.into_request()).await?;
    Ok(Json(page))
}
