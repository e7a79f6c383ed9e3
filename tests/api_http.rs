// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /analyze-feed (200 contract, 400 field errors, 422 window, overrides)

use serde_json::json;
use serde_json::Value as Json;
use shuttle_axum::axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

use feed_analyzer::api;
use feed_analyzer::config::AnalyzerConfig;
use feed_analyzer::AppState;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Same Router the binary uses, with built-in config.
fn test_router() -> Router {
    api::router(AppState::new(AnalyzerConfig::default()))
}

async fn post_feed(payload: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("POST")
        .uri("/analyze-feed")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_owned()))
        .expect("build POST /analyze-feed");

    let resp = test_router()
        .oneshot(req)
        .await
        .expect("oneshot /analyze-feed");
    let status = resp.status();

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read json")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse response json");
    (status, v)
}

fn message(id: &str, user: &str, content: &str, ts: &str) -> Json {
    json!({
        "id": id,
        "content": content,
        "timestamp": ts,
        "user_id": user,
        "hashtags": [],
        "reactions": 0,
        "shares": 0,
        "views": 0
    })
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert_eq!(body.trim(), "OK", "health body should be 'OK'");
}

#[tokio::test]
async fn analyze_feed_returns_expected_json_fields() {
    let payload = json!({
        "messages": [
            message("msg_001", "user_alice", "Adorei o produto! #tech", "2025-09-10T10:00:00Z"),
            message("msg_002", "user_bob", "Não gostei do suporte #help", "2025-09-10T10:05:00Z"),
        ],
        "time_window_minutes": 30
    });
    let (status, v) = post_feed(&payload.to_string()).await;
    assert_eq!(status, StatusCode::OK, "body: {v}");

    let a = v.get("analysis").expect("missing 'analysis' wrapper");
    // Contract checks for UI consumers
    for key in [
        "sentiment_distribution",
        "engagement_score",
        "trending_topics",
        "influence_ranking",
        "anomaly_detected",
        "anomaly_details",
        "flags",
        "processing_time_ms",
    ] {
        assert!(a.get(key).is_some(), "missing '{key}'");
    }

    let dist = &a["sentiment_distribution"];
    assert_eq!(dist["positive"], 50.0);
    assert_eq!(dist["negative"], 50.0);
    assert_eq!(dist["neutral"], 0.0);

    let topics = a["trending_topics"].as_array().expect("topics array");
    assert_eq!(topics.len(), 2);

    let ranking = a["influence_ranking"].as_array().expect("ranking array");
    assert_eq!(ranking.len(), 2);
    for entry in ranking {
        assert!(entry.get("user_id").is_some());
        assert!(entry.get("followers").is_some());
        assert!(entry.get("engagement_rate").is_some());
        assert!(entry.get("influence_score").is_some());
    }
}

#[tokio::test]
async fn invalid_user_id_is_400_with_field_location() {
    let payload = json!({
        "messages": [message("msg_001", "alice", "bom", "2025-09-10T10:00:00Z")],
        "time_window_minutes": 30
    });
    let (status, v) = post_feed(&payload.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["code"], "INVALID_PAYLOAD");

    let details = v["details"].as_array().expect("details array");
    assert!(
        details.iter().any(|d| d["loc"] == "messages.0.user_id"),
        "details: {details:?}"
    );
}

#[tokio::test]
async fn timestamp_without_z_is_400() {
    let payload = json!({
        "messages": [message("msg_001", "user_alice", "bom", "2025-09-10T10:00:00+00:00")],
        "time_window_minutes": 30
    });
    let (status, v) = post_feed(&payload.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["code"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn content_over_280_chars_is_400() {
    let long = "a".repeat(281);
    let payload = json!({
        "messages": [message("msg_001", "user_alice", &long, "2025-09-10T10:00:00Z")],
        "time_window_minutes": 30
    });
    let (status, v) = post_feed(&payload.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["details"][0]["loc"], "messages.0.content");
}

#[tokio::test]
async fn empty_messages_is_400() {
    let (status, v) = post_feed(r#"{"messages": [], "time_window_minutes": 30}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["code"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn malformed_json_is_400() {
    let (status, v) = post_feed(r#"{"messages": [ "#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["code"], "INVALID_PAYLOAD");
    assert_eq!(v["details"][0]["loc"], "body");
}

#[tokio::test]
async fn unsupported_window_is_422() {
    let payload = json!({
        "messages": [message("msg_001", "user_alice", "bom", "2025-09-10T10:00:00Z")],
        "time_window_minutes": 123
    });
    let (status, v) = post_feed(&payload.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(v["code"], "UNSUPPORTED_TIME_WINDOW");
    assert!(v.get("details").is_none());
}

#[tokio::test]
async fn field_errors_win_over_unsupported_window() {
    let payload = json!({
        "messages": [message("msg_001", "bad id", "bom", "2025-09-10T10:00:00Z")],
        "time_window_minutes": 123
    });
    let (status, v) = post_feed(&payload.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["code"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn technical_test_phrase_sets_candidate_flag() {
    let payload = json!({
        "messages": [
            message("msg_001", "user_alice", "Adorei!", "2025-09-10T10:00:00Z"),
            message("msg_002", "user_mbras_dev", "teste técnico mbras", "2025-09-10T10:01:00Z"),
        ],
        "time_window_minutes": 30
    });
    let (status, v) = post_feed(&payload.to_string()).await;
    assert_eq!(status, StatusCode::OK, "body: {v}");

    let a = &v["analysis"];
    assert_eq!(a["flags"]["candidate_awareness"], true);
    assert_eq!(a["flags"]["mbras_employee"], true);
    assert_eq!(a["engagement_score"], 9.42);
    assert_eq!(a["sentiment_distribution"]["positive"], 0.0);
    assert_eq!(a["sentiment_distribution"]["negative"], 0.0);
    assert_eq!(a["sentiment_distribution"]["neutral"], 0.0);
}

#[tokio::test]
async fn max_engagement_counters_are_accepted() {
    let viral = |id: &str, ts: &str| {
        json!({
            "id": id,
            "content": "Adorei!",
            "timestamp": ts,
            "user_id": "user_viral",
            "reactions": i64::MAX,
            "shares": i64::MAX,
            "views": 1
        })
    };
    let payload = json!({
        "messages": [
            viral("msg_001", "2025-09-10T10:00:00Z"),
            viral("msg_002", "2025-09-10T10:00:10Z"),
            viral("msg_003", "2025-09-10T10:00:20Z"),
        ],
        "time_window_minutes": 30
    });
    let (status, v) = post_feed(&payload.to_string()).await;
    assert_eq!(status, StatusCode::OK, "body: {v}");
    assert!(v["analysis"]["engagement_score"].as_f64().is_some());
}
