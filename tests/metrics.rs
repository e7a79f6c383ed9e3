// tests/metrics.rs
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

// Build full in-process app (includes /metrics when gated via env).
async fn build_app() -> Router {
    std::env::set_var("DEBUG_ROUTES", "1");
    feed_analyzer::app()
        .await
        .expect("app() should build Router in tests")
}

fn valid_payload() -> &'static str {
    r#"{
        "messages": [
            {"id":"msg_001","content":"Adorei #rust","timestamp":"2025-09-10T10:00:00Z","user_id":"user_alice"},
            {"id":"msg_002","content":"ruim","timestamp":"2025-09-10T10:00:01Z","user_id":"user_bob"}
        ],
        "time_window_minutes": 30
    }"#
}

async fn scrape(app: Router) -> String {
    let resp = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    // axum::body::to_bytes requires an explicit limit
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn analyze_then_scrape_contains_expected_series() {
    let app = build_app().await;

    let r = app
        .clone()
        .oneshot(
            Request::post("/analyze-feed")
                .header("content-type", "application/json")
                .body(Body::from(valid_payload()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(r.status(), StatusCode::OK);

    let text = scrape(app).await;
    for needle in [
        "feed_analyze_requests_total",
        "feed_messages_analyzed_total",
        "feed_analyze_duration_ms",
    ] {
        assert!(
            text.contains(needle),
            "metrics exposition missing '{needle}'\n{text}"
        );
    }
}

#[tokio::test]
async fn rejected_request_is_counted_by_code() {
    let app = build_app().await;

    let r = app
        .clone()
        .oneshot(
            Request::post("/analyze-feed")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"messages":[],"time_window_minutes":30}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(r.status(), StatusCode::BAD_REQUEST);

    let text = scrape(app).await;
    assert!(
        text.contains("feed_analyze_rejected_total") && text.contains("INVALID_PAYLOAD"),
        "no rejection series\n{text}"
    );
}
