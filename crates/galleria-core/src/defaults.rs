//! Centralized default constants for galleria.

// =============================================================================
// PAGINATION
// =============================================================================

/// Page size used when the client does not supply `limit`.
pub const PAGE_LIMIT: i64 = 20;

/// Largest page size a client may request; larger values are clamped.
pub const PAGE_LIMIT_MAX: i64 = 100;

/// Smallest page size; zero and negative values are clamped up to this.
pub const PAGE_LIMIT_MIN: i64 = 1;

/// Longest media id, in bytes, the service stores and serves.
///
/// Ids travel inside cursor tokens, so this also bounds the token length.
pub const MAX_MEDIA_ID_LEN: usize = 512;

/// Longest RFC 3339 timestamp a cursor payload carries
/// (`9999-12-31T23:59:59.999999999+14:00`).
pub const MAX_CURSOR_TIMESTAMP_LEN: usize = 35;

/// Separator between the timestamp and the tie-breaking id inside a cursor payload.
pub const CURSOR_ID_SEPARATOR: char = '|';

/// Longest cursor token accepted before decoding is attempted: the unpadded
/// base64 length of the largest payload the server can issue.
pub const MAX_CURSOR_LEN: usize =
    ((MAX_CURSOR_TIMESTAMP_LEN + CURSOR_ID_SEPARATOR.len_utf8() + MAX_MEDIA_ID_LEN) * 4 + 2) / 3;

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const SERVER_PORT: u16 = 3000;

/// Default rate limit: requests per period.
pub const RATE_LIMIT_REQUESTS: u64 = 100;

/// Default rate limit period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;
