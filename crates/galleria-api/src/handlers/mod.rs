//! HTTP handlers for galleria-api.

pub mod feed;
pub mod media;
pub mod tags;

use axum::{response::IntoResponse, Json};

pub use feed::{get_feed, search_media};
pub use media::get_media;
pub use tags::list_tags;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
