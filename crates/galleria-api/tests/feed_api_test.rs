//! End-to-end tests for the HTTP surface, backed by the in-memory repository.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use galleria_api::{
    build_router, config::RateLimitConfig, middleware::build_rate_limiter, AppState,
};
use galleria_core::defaults::{MAX_CURSOR_LEN, MAX_MEDIA_ID_LEN};
use galleria_db::{InMemoryMediaRepository, MediaKind, RepoOp};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
}

fn app(repo: &InMemoryMediaRepository) -> Router {
    let state = AppState::new(Arc::new(repo.clone()));
    build_router(state, &["http://localhost:3000".to_string()])
}

/// `count` images, one minute apart, `m00` oldest.
fn seeded(count: usize) -> InMemoryMediaRepository {
    let repo = InMemoryMediaRepository::new();
    for i in 0..count {
        repo.insert_simple(
            &format!("m{:02}", i),
            base_time() + Duration::minutes(i as i64),
            MediaKind::Image,
        );
    }
    repo
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn ids(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

/// Follow `nextCursor` until it is null, collecting every id served.
async fn walk(app: &Router, path: &str) -> Vec<String> {
    let mut seen = Vec::new();
    let mut uri = path.to_string();
    for _ in 0..100 {
        let (status, body) = get(app, &uri).await;
        assert_eq!(status, StatusCode::OK);
        seen.extend(ids(&body));
        match body["nextCursor"].as_str() {
            Some(cursor) => {
                let sep = if path.contains('?') { '&' } else { '?' };
                uri = format!("{}{}cursor={}", path, sep, cursor);
            }
            None => return seen,
        }
    }
    panic!("pagination did not terminate");
}

#[tokio::test]
async fn test_health() {
    let app = app(&InMemoryMediaRepository::new());
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_feed_pages_through_25_items() {
    let repo = seeded(25);
    let app = app(&repo);

    let (status, first) = get(&app, "/api/v1/feed?limit=10").await;
    assert_eq!(status, StatusCode::OK);
    let first_ids = ids(&first);
    assert_eq!(first_ids.len(), 10);
    assert_eq!(first_ids[0], "m24");
    assert_eq!(first_ids[9], "m15");
    assert!(first.get("totalMatches").is_none());
    let cursor = first["nextCursor"].as_str().unwrap();

    let (_, second) = get(&app, &format!("/api/v1/feed?limit=10&cursor={}", cursor)).await;
    let second_ids = ids(&second);
    assert_eq!(second_ids.len(), 10);
    assert_eq!(second_ids[0], "m14");
    let cursor = second["nextCursor"].as_str().unwrap();

    let (_, third) = get(&app, &format!("/api/v1/feed?limit=10&cursor={}", cursor)).await;
    let third_ids = ids(&third);
    assert_eq!(third_ids.len(), 5);
    assert_eq!(third_ids[4], "m00");
    assert!(third["nextCursor"].is_null());
}

#[tokio::test]
async fn test_item_shape() {
    let repo = seeded(1);
    let app = app(&repo);

    let (_, body) = get(&app, "/api/v1/feed").await;
    let item = &body["data"][0];
    assert_eq!(item["id"], "m00");
    assert_eq!(item["type"], "image");
    assert_eq!(item["src"], "https://media.example/m00");
    assert_eq!(item["createdAt"], "2026-05-01T12:00:00Z");
    assert!(item.get("tags").is_none());
}

#[tokio::test]
async fn test_malformed_cursor_starts_from_newest() {
    let repo = seeded(5);
    let app = app(&repo);

    let (status, body) = get(&app, "/api/v1/feed?cursor=not-a-cursor!!").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body)[0], "m04");

    let (status, body) = get(&app, "/api/v1/feed?cursor=bm90IGEgZGF0ZQ").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body).len(), 5);
}

#[tokio::test]
async fn test_limit_is_clamped() {
    let repo = seeded(150);
    let app = app(&repo);

    let (_, body) = get(&app, "/api/v1/feed?limit=0").await;
    assert_eq!(ids(&body).len(), 1);

    let (_, body) = get(&app, "/api/v1/feed?limit=1000").await;
    assert_eq!(ids(&body).len(), 100);
    assert!(body["nextCursor"].is_string());

    let (_, body) = get(&app, "/api/v1/feed?limit=-5").await;
    assert_eq!(ids(&body).len(), 1);

    let (status, body) = get(&app, "/api/v1/feed?limit=lots").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body).len(), 20);
}

#[tokio::test]
async fn test_type_filter() {
    let repo = seeded(4);
    repo.insert_simple("v1", base_time() + Duration::hours(1), MediaKind::Video);
    repo.insert_simple("v2", base_time() - Duration::hours(1), MediaKind::Video);
    let app = app(&repo);

    let (_, body) = get(&app, "/api/v1/feed?type=video").await;
    assert_eq!(ids(&body), vec!["v1", "v2"]);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|item| item["type"] == "video"));

    let (status, body) = get(&app, "/api/v1/feed?type=hologram").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body).len(), 6);
}

#[tokio::test]
async fn test_search_requires_tags() {
    let repo = seeded(3);
    let app = app(&repo);

    let (status, body) = get(&app, "/api/v1/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = get(&app, "/api/v1/search?tags=%20,%20,").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(repo.call_count(RepoOp::FetchPage), 0);
}

#[tokio::test]
async fn test_search_with_empty_intersection_skips_fetch() {
    let repo = seeded(10);
    repo.tag("m01", "hair", "blonde");
    repo.tag("m02", "place", "beach");
    let app = app(&repo);

    let (status, body) = get(&app, "/api/v1/search?tags=blonde,beach").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], serde_json::json!([]));
    assert!(body["nextCursor"].is_null());
    assert_eq!(body["totalMatches"], 0);
    assert_eq!(repo.call_count(RepoOp::ResolveIdsForTags), 1);
    assert_eq!(repo.call_count(RepoOp::FetchPage), 0);
}

#[tokio::test]
async fn test_search_three_of_hundred() {
    let repo = seeded(100);
    for id in ["m10", "m50", "m90"] {
        repo.tag(id, "hair", "blonde");
        repo.tag(id, "place", "beach");
    }
    // Carry only one of the two tags.
    repo.tag("m20", "hair", "blonde");
    repo.tag("m60", "place", "beach");
    let app = app(&repo);

    let (status, body) = get(&app, "/api/v1/search?tags=blonde,beach").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["m90", "m50", "m10"]);
    assert_eq!(body["totalMatches"], 3);
    assert!(body["nextCursor"].is_null());

    let tags = &body["data"][0]["tags"];
    assert_eq!(tags["hair"], serde_json::json!(["blonde"]));
    assert_eq!(tags["place"], serde_json::json!(["beach"]));
}

#[tokio::test]
async fn test_search_paginates_and_keeps_total() {
    let repo = seeded(30);
    for i in (0..30).step_by(2) {
        repo.tag(&format!("m{:02}", i), "mood", "sunny");
    }
    let app = app(&repo);

    let (_, first) = get(&app, "/api/v1/search?tags=sunny&limit=4").await;
    assert_eq!(first["totalMatches"], 15);
    assert_eq!(ids(&first), vec!["m28", "m26", "m24", "m22"]);

    let all = walk(&app, "/api/v1/search?tags=sunny&limit=4").await;
    assert_eq!(all.len(), 15);
    assert!(all.iter().all(|id| id[1..].parse::<u32>().unwrap() % 2 == 0));
}

#[tokio::test]
async fn test_feed_with_tags_filters_without_total() {
    let repo = seeded(6);
    repo.tag("m03", "place", "beach");
    repo.tag("m05", "place", "beach");
    let app = app(&repo);

    let (status, body) = get(&app, "/api/v1/feed?tags=beach").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["m05", "m03"]);
    assert!(body.get("totalMatches").is_none());
}

#[tokio::test]
async fn test_traversal_with_timestamp_collisions() {
    let repo = InMemoryMediaRepository::new();
    let same = base_time();
    for id in ["a", "b", "c", "d", "e", "f", "g"] {
        repo.insert_simple(id, same, MediaKind::Image);
    }
    repo.insert_simple("newer", same + Duration::seconds(1), MediaKind::Video);
    repo.insert_simple("older", same - Duration::seconds(1), MediaKind::Image);
    let app = app(&repo);

    let served = walk(&app, "/api/v1/feed?limit=2").await;
    assert_eq!(served.len(), 9);
    let unique: HashSet<&String> = served.iter().collect();
    assert_eq!(unique.len(), 9);
    assert_eq!(served.first().map(String::as_str), Some("newer"));
    assert_eq!(served.last().map(String::as_str), Some("older"));
}

#[tokio::test]
async fn test_traversal_with_long_ids() {
    let repo = InMemoryMediaRepository::new();
    let mut expected = Vec::new();
    for i in 0..4 {
        let id = format!("{}{}", "x".repeat(399), i);
        repo.insert_simple(&id, base_time() + Duration::minutes(i), MediaKind::Image);
        expected.push(id);
    }
    expected.reverse();
    let app = app(&repo);

    let (_, first) = get(&app, "/api/v1/feed?limit=2").await;
    assert!(first["nextCursor"].as_str().unwrap().len() > 512);

    let served = walk(&app, "/api/v1/feed?limit=2").await;
    assert_eq!(served, expected);
}

#[tokio::test]
async fn test_traversal_with_longest_ids_sharing_a_timestamp() {
    let repo = InMemoryMediaRepository::new();
    for c in ['a', 'b', 'c', 'd', 'e'] {
        let id = c.to_string().repeat(MAX_MEDIA_ID_LEN);
        repo.insert_simple(&id, base_time(), MediaKind::Video);
    }
    let app = app(&repo);

    let (_, first) = get(&app, "/api/v1/feed?limit=2").await;
    assert!(first["nextCursor"].as_str().unwrap().len() <= MAX_CURSOR_LEN);

    let served = walk(&app, "/api/v1/feed?limit=2").await;
    let firsts: Vec<char> = served.iter().map(|id| id.chars().next().unwrap()).collect();
    assert_eq!(firsts, vec!['e', 'd', 'c', 'b', 'a']);
}

#[tokio::test]
async fn test_overlong_stored_id_is_500() {
    let repo = seeded(2);
    repo.insert_simple(
        &"x".repeat(MAX_MEDIA_ID_LEN + 1),
        base_time() + Duration::hours(1),
        MediaKind::Image,
    );
    let app = app(&repo);

    let (status, body) = get(&app, "/api/v1/feed").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_repeated_query_keys_keep_first_value() {
    let repo = seeded(10);
    repo.tag("m03", "place", "beach");
    repo.tag("m04", "hair", "blonde");
    let app = app(&repo);

    let (status, body) = get(&app, "/api/v1/feed?limit=5&limit=6").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body).len(), 5);

    let (status, body) = get(&app, "/api/v1/search?tags=beach&tags=blonde").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["m03"]);
    assert_eq!(body["totalMatches"], 1);

    let (status, body) = get(&app, "/api/v1/feed?type=video&type=image").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn test_fetch_failure_is_500_not_empty_page() {
    let repo = seeded(3).failing_on(RepoOp::FetchPage);
    let app = app(&repo);

    let (status, body) = get(&app, "/api/v1/feed").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_tag_resolution_failure_is_500() {
    let repo = seeded(3).failing_on(RepoOp::ResolveIdsForTags);
    let app = app(&repo);

    let (status, _) = get(&app, "/api/v1/search?tags=beach").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(repo.call_count(RepoOp::FetchPage), 0);
}

#[tokio::test]
async fn test_get_media() {
    let repo = seeded(2);
    repo.tag("m01", "place", "beach");
    repo.tag("m01", "place", "city");
    let app = app(&repo);

    let (status, body) = get(&app, "/api/v1/media/m01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "m01");
    assert_eq!(body["tags"]["place"], serde_json::json!(["beach", "city"]));

    let (status, body) = get(&app, "/api/v1/media/m00").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tags"], serde_json::json!({}));

    let (status, body) = get(&app, "/api/v1/media/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_tag_catalog() {
    let repo = seeded(3);
    repo.tag("m00", "place", "beach");
    repo.tag("m01", "place", "beach");
    repo.tag("m01", "hair", "blonde");
    let app = app(&repo);

    let (status, body) = get(&app, "/api/v1/tags").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        serde_json::json!([
            { "category": "hair", "values": [{ "value": "blonde", "count": 1 }] },
            { "category": "place", "values": [{ "value": "beach", "count": 2 }] },
        ])
    );
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = app(&InMemoryMediaRepository::new());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_rate_limit_rejects_over_quota() {
    let repo = seeded(1);
    let limiter = build_rate_limiter(&RateLimitConfig {
        enabled: true,
        requests: 1,
        period_secs: 3600,
    });
    let state = AppState::new(Arc::new(repo.clone())).with_rate_limiter(limiter);
    let app = build_router(state, &["http://localhost:3000".to_string()]);

    let (status, _) = get(&app, "/api/v1/feed").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = get(&app, "/api/v1/feed").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].is_string());
}
