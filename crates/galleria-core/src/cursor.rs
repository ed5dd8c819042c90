//! Opaque pagination cursor codec.
//!
//! A cursor is the base64url (unpadded) encoding of the creation timestamp
//! of the last item of a page, optionally followed by `|<id>` so that items
//! sharing a timestamp are still split deterministically across pages.
//!
//! Ids are at most [`MAX_MEDIA_ID_LEN`] bytes, so every token the server
//! issues fits within [`MAX_CURSOR_LEN`] and decodes again.
//!
//! Decoding never fails loudly: tokens are client-held and may be stale,
//! truncated or tampered with, so anything unreadable decodes to `None` and
//! the request proceeds as if no cursor had been sent.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::defaults::{CURSOR_ID_SEPARATOR, MAX_CURSOR_LEN, MAX_MEDIA_ID_LEN};

/// Position after which the next page starts.
///
/// Items strictly older than `created_at` follow the cursor. When `id` is
/// present, items with exactly `created_at` and an id ordered below `id`
/// follow it as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub created_at: DateTime<Utc>,
    pub id: Option<String>,
}

impl PageCursor {
    /// Cursor bounded by timestamp only.
    pub fn from_timestamp(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            id: None,
        }
    }

    /// Cursor bounded by timestamp with an id tie-breaker.
    pub fn after_item(created_at: DateTime<Utc>, id: impl Into<String>) -> Self {
        Self {
            created_at,
            id: Some(id.into()),
        }
    }

    /// Encode to the URL-safe wire token.
    pub fn encode(&self) -> String {
        let mut payload = canonical_timestamp(&self.created_at);
        if let Some(id) = &self.id {
            payload.push(CURSOR_ID_SEPARATOR);
            payload.push_str(id);
        }
        URL_SAFE_NO_PAD.encode(payload.as_bytes())
    }

    /// Decode a wire token. Returns `None` for anything malformed.
    pub fn decode(token: &str) -> Option<Self> {
        let token = token.trim().trim_end_matches('=');
        if token.is_empty() || token.len() > MAX_CURSOR_LEN {
            return None;
        }

        let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
        let payload = String::from_utf8(bytes).ok()?;

        let (ts, id) = match payload.split_once(CURSOR_ID_SEPARATOR) {
            Some((_, "")) => return None,
            Some((_, id)) if id.len() > MAX_MEDIA_ID_LEN => return None,
            Some((ts, id)) => (ts, Some(id.to_string())),
            None => (payload.as_str(), None),
        };

        let created_at = DateTime::parse_from_rfc3339(ts)
            .ok()?
            .with_timezone(&Utc);

        Some(Self { created_at, id })
    }
}

/// Encode a bare timestamp as a cursor token.
pub fn encode_timestamp(created_at: &DateTime<Utc>) -> String {
    PageCursor::from_timestamp(*created_at).encode()
}

/// Decode a cursor token back to its timestamp, or `None` if malformed.
pub fn decode_timestamp(token: &str) -> Option<DateTime<Utc>> {
    PageCursor::decode(token).map(|c| c.created_at)
}

/// RFC 3339 in UTC with the shortest fractional part that is still exact.
fn canonical_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
