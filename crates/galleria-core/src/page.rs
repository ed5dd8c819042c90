//! Page sizing, page assembly and the response envelope.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cursor::PageCursor;
use crate::defaults::{PAGE_LIMIT, PAGE_LIMIT_MAX, PAGE_LIMIT_MIN};
use crate::error::Result;
use crate::models::{MediaItem, MediaRow};

/// Requested page size after clamping to `[PAGE_LIMIT_MIN, PAGE_LIMIT_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimit(i64);

impl PageLimit {
    /// Clamp a requested size; `None` selects the default.
    pub fn clamp(requested: Option<i64>) -> Self {
        let n = requested.unwrap_or(PAGE_LIMIT);
        Self(n.clamp(PAGE_LIMIT_MIN, PAGE_LIMIT_MAX))
    }

    /// Parse the raw `limit` query value. Unparsable values select the default.
    pub fn parse(raw: Option<&str>) -> Self {
        let parsed = raw.and_then(|s| {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                // Out-of-range integers clamp instead of falling back.
                let digits = s.strip_prefix('-').unwrap_or(s);
                if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                    Some(if s.starts_with('-') { i64::MIN } else { i64::MAX })
                } else {
                    None
                }
            })
        });
        Self::clamp(parsed)
    }

    pub fn get(&self) -> i64 {
        self.0
    }

    /// Rows to fetch: one more than the page size, to detect a next page.
    pub fn fetch_limit(&self) -> i64 {
        self.0 + 1
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self(PAGE_LIMIT)
    }
}

/// One page ready to be serialised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPage {
    pub items: Vec<MediaItem>,
    pub has_next_page: bool,
    pub next_cursor: Option<String>,
}

impl AssembledPage {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            has_next_page: false,
            next_cursor: None,
        }
    }
}

/// Turn an over-fetched row set into a page.
///
/// More than `limit` rows means another page exists; the extra row is
/// dropped and the cursor is taken from the last row kept, so the next
/// request starts right after it.
pub fn assemble_page(mut rows: Vec<MediaRow>, limit: PageLimit) -> Result<AssembledPage> {
    let limit = limit.get() as usize;
    let has_next_page = rows.len() > limit;
    if has_next_page {
        rows.truncate(limit);
    }

    let next_cursor = if has_next_page {
        rows.last()
            .map(|last| PageCursor::after_item(last.created_at, last.id.clone()).encode())
    } else {
        None
    };

    let items = rows
        .into_iter()
        .map(MediaItem::try_from)
        .collect::<Result<Vec<_>>>()?;

    trace!(
        subsystem = "feed",
        component = "assembler",
        result_count = items.len(),
        has_next_page,
        "Assembled page"
    );

    Ok(AssembledPage {
        items,
        has_next_page,
        next_cursor,
    })
}

/// Response body of the feed and search endpoints.
///
/// ```json
/// { "data": [...], "nextCursor": "MjAyNi0wNS0xN1Q...", "totalMatches": 3 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub data: Vec<MediaItem>,
    pub next_cursor: Option<String>,
    /// Only set by the search variant.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_matches: Option<usize>,
}

impl FeedResponse {
    pub fn from_page(page: AssembledPage, total_matches: Option<usize>) -> Self {
        Self {
            data: page.items,
            next_cursor: page.next_cursor,
            total_matches,
        }
    }
}
