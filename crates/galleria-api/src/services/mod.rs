//! Service layer for business logic.

pub mod feed_service;
pub mod tag_resolver;

pub use feed_service::{FeedRequest, FeedService, FeedVariant};
pub use tag_resolver::TagResolver;
