//! Core traits for galleria abstractions.
//!
//! The repository trait is the only seam between the feed protocol and
//! storage, so handlers receive it by injection and tests substitute an
//! in-memory implementation.

use async_trait::async_trait;

use crate::cursor::PageCursor;
use crate::error::Result;
use crate::models::*;

// =============================================================================
// MEDIA REPOSITORY
// =============================================================================

/// Parameters of one bounded, ordered page fetch.
///
/// Rows come back ordered by `created_at DESC, id DESC`, at most
/// `fetch_limit` of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// Restrict to these ids. `Some(empty)` is never built by the planner.
    pub allowed_ids: Option<Vec<String>>,
    /// Restrict to one media kind.
    pub kind: Option<MediaKind>,
    /// Only rows strictly after this position in the ordering.
    pub cursor: Option<PageCursor>,
    /// Page size plus one.
    pub fetch_limit: i64,
}

impl PageQuery {
    /// Whether a row at (`created_at`, `id`) falls after the cursor.
    ///
    /// Shared by in-process backends so they order exactly like SQL ones.
    pub fn is_after_cursor(&self, row: &MediaRow) -> bool {
        match &self.cursor {
            None => true,
            Some(c) => match &c.id {
                None => row.created_at < c.created_at,
                Some(id) => {
                    row.created_at < c.created_at
                        || (row.created_at == c.created_at && row.id.as_str() < id.as_str())
                }
            },
        }
    }
}

/// Read-only access to media and tags.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Ids of items carrying every one of `values` (category-agnostic).
    ///
    /// Callers never pass an empty slice.
    async fn resolve_ids_for_tags(&self, values: &[String]) -> Result<Vec<String>>;

    /// Fetch one ordered, bounded page of rows.
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<MediaRow>>;

    /// Tag assignments for the given items.
    async fn fetch_tags(&self, media_ids: &[String]) -> Result<Vec<TagAssignment>>;

    /// Fetch a single item by id.
    async fn get_item(&self, id: &str) -> Result<Option<MediaRow>>;

    /// Usage counts of every tag value.
    async fn list_tag_counts(&self) -> Result<Vec<TagCount>>;
}
