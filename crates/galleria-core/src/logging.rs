//! Structured logging schema for galleria.
//!
//! These are the field names emitted by `tracing` call sites across the
//! crates. `tracing` macros take field names as literals, so call sites
//! spell them out; this module is the reference list that log aggregation
//! queries against, and new fields are added here first.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Backing store failure surfaced to the client as a 500 |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown, pool established) |
//! | DEBUG | Decision points (cursor ignored, short-circuit taken) |
//! | TRACE | Per-row data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the `x-request-id` header.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db", "feed"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "tag_resolver", "feed_service", "pool", "media_repo"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "resolve", "fetch_page", "fetch_tags"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Media kind filter ("image", "video").
pub const MEDIA_KIND: &str = "media_kind";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned by a query.
pub const RESULT_COUNT: &str = "result_count";

/// Length of a cursor token that could not be decoded.
pub const CURSOR_LEN: &str = "cursor_len";

/// Number of distinct tag values in a filter.
pub const TAG_COUNT: &str = "tag_count";

/// Size of the full tag-intersection match set.
pub const MATCH_COUNT: &str = "match_count";

/// Effective page size after clamping.
pub const PAGE_LIMIT: &str = "page_limit";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Whether another page follows this one.
pub const HAS_NEXT_PAGE: &str = "has_next_page";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Every field name above.
pub const ALL_FIELDS: &[&str] = &[
    REQUEST_ID,
    SUBSYSTEM,
    COMPONENT,
    OPERATION,
    MEDIA_KIND,
    DURATION_MS,
    RESULT_COUNT,
    CURSOR_LEN,
    TAG_COUNT,
    MATCH_COUNT,
    PAGE_LIMIT,
    POOL_SIZE,
    POOL_IDLE,
    HAS_NEXT_PAGE,
    ERROR_MSG,
];
