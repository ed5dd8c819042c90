//! Query parameter types for the feed and search endpoints.
//!
//! The query string is taken as raw key/value pairs so that a bad or
//! repeated value never turns into an extractor rejection: pagination
//! parameters are recovered locally (clamped, defaulted or ignored) instead
//! of failing the request. When a key repeats, its first value wins.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use galleria_core::{normalize_tags, MediaKind, PageCursor, PageLimit};
use tracing::debug;

use crate::{services::FeedRequest, ApiError};

/// Extractor for [`FeedParams`]. A query string that cannot be decoded at
/// all is reported as a JSON 400 like every other client error.
#[derive(Debug)]
pub struct FeedQuery(pub FeedParams);

#[async_trait]
impl<S> FromRequestParts<S> for FeedQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(FeedQuery(FeedParams::from_pairs(pairs)))
    }
}

/// Raw `?cursor=&limit=&type=&tags=` parameters.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FeedParams {
    /// `nextCursor` from a previous response.
    pub cursor: Option<String>,
    /// Page size, clamped to `[1, 100]`, default 20.
    pub limit: Option<String>,
    /// `type`: `image` or `video`; anything else is ignored.
    pub kind: Option<String>,
    /// Comma-separated tag values.
    pub tags: Option<String>,
}

impl FeedParams {
    /// Collect the known keys from decoded query pairs. Unknown keys are
    /// ignored and only the first value of a repeated key is kept.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "cursor" => &mut params.cursor,
                "limit" => &mut params.limit,
                "type" => &mut params.kind,
                "tags" => &mut params.tags,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Normalise into a [`FeedRequest`].
    pub fn into_request(self) -> FeedRequest {
        let cursor = self.cursor.as_deref().and_then(|raw| {
            let decoded = PageCursor::decode(raw);
            if decoded.is_none() && !raw.trim().is_empty() {
                debug!(
                    subsystem = "api",
                    component = "query",
                    cursor_len = raw.len(),
                    "Ignoring malformed cursor; starting from the newest item"
                );
            }
            decoded
        });

        let kind = MediaKind::parse_filter(self.kind.as_deref());
        if kind.is_none() {
            if let Some(raw) = self.kind.as_deref().filter(|s| !s.trim().is_empty()) {
                debug!(
                    subsystem = "api",
                    component = "query",
                    media_kind = raw,
                    "Ignoring unknown media type filter"
                );
            }
        }

        FeedRequest {
            cursor,
            limit: PageLimit::parse(self.limit.as_deref()),
            kind,
            tags: self.tags.as_deref().map(normalize_tags).unwrap_or_default(),
        }
    }
}
