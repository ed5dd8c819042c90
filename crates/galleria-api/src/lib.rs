//! # galleria-api
//!
//! HTTP surface for the galleria media feed: a cursor-paginated listing,
//! tag search, single-item lookup and the tag catalog.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod query_types;
pub mod services;

use std::sync::Arc;

use axum::{routing::get, Router};
use galleria_core::MediaRepository;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub use error::ApiError;
pub use middleware::{GlobalRateLimiter, MakeRequestUuidV7, RequestIdSpan};
pub use services::{FeedRequest, FeedService, FeedVariant, TagResolver};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub feed: FeedService,
    pub repo: Arc<dyn MediaRepository>,
    /// Global rate limiter (None if rate limiting is disabled).
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

impl AppState {
    pub fn new(repo: Arc<dyn MediaRepository>) -> Self {
        Self {
            feed: FeedService::new(repo.clone()),
            repo,
            rate_limiter: None,
        }
    }

    pub fn with_rate_limiter(mut self, limiter: Option<Arc<GlobalRateLimiter>>) -> Self {
        self.rate_limiter = limiter;
        self
    }
}

/// Build the router with all routes and middleware attached.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/v1/feed", get(handlers::get_feed))
        .route("/api/v1/search", get(handlers::search_media))
        .route("/api/v1/media/:id", get(handlers::get_media))
        .route("/api/v1/tags", get(handlers::list_tags))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http().make_span_with(RequestIdSpan))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(middleware::cors_layer(allowed_origins))
        .with_state(state)
}
