// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /process-comment
// - POST /process-batch
// - GET /automation-stats

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use comment_autopilot::api::{create_router, AppState};
use comment_autopilot::automation::AutomationSystem;
use comment_autopilot::pipeline::CommentProcessor;
use comment_autopilot::provider::MockProvider;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Build the same Router the binary uses, backed by a mock provider and no CRM.
fn test_router(fixed_classification: &str) -> Router {
    let provider = Arc::new(MockProvider::new(fixed_classification));
    let automation = Arc::new(AutomationSystem::new(CommentProcessor::new(provider), None));
    create_router(AppState { automation })
}

async fn json_body(resp: axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router("QUESTION");

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
    assert_eq!(String::from_utf8(bytes).unwrap().trim(), "OK");
}

#[tokio::test]
async fn api_process_comment_returns_full_record() {
    // The mock answers "LEAD" to both calls; the classification is a valid
    // token and the reply is that same non-empty text.
    let app = test_router("LEAD");

    let payload = json!({
        "comment": "I'm interested in your product! How can I order?",
        "platform": "facebook",
        "user_info": { "username": "john_doe" },
        "post_id": "123456789"
    });
    let req = Request::builder()
        .method("POST")
        .uri("/process-comment")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /process-comment");

    let resp = app.oneshot(req).await.expect("oneshot /process-comment");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["category"], "LEAD");
    assert_eq!(body["platform"], "facebook");
    assert_eq!(body["ai_success"], true);
    assert_eq!(body["actions"]["should_pin_comment"], true);
    assert_eq!(body["actions"]["priority_level"], "high");
    assert!(body["reply"].as_str().is_some_and(|r| !r.is_empty()));
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn api_process_batch_preserves_order() {
    let app = test_router("PRAISE");

    let payload = json!([
        { "comment": "first",  "platform": "instagram", "user_info": { "username": "a" } },
        { "comment": "second", "platform": "facebook",  "user_info": { "username": "b" } }
    ]);
    let req = Request::builder()
        .method("POST")
        .uri("/process-batch")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /process-batch");

    let resp = app.oneshot(req).await.expect("oneshot /process-batch");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    let records = body.as_array().expect("array body");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["comment"], "first");
    assert_eq!(records[1]["comment"], "second");
}

#[tokio::test]
async fn api_automation_stats_counts_processed_comments() {
    let provider = Arc::new(MockProvider::new("SPAM"));
    let automation = Arc::new(AutomationSystem::new(CommentProcessor::new(provider), None));
    let app = create_router(AppState {
        automation: automation.clone(),
    });

    let payload = json!({
        "comment": "Click here for free followers!!!",
        "platform": "instagram",
        "user_info": { "username": "spammy" }
    });
    let req = Request::builder()
        .method("POST")
        .uri("/process-comment")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /process-comment");
    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("oneshot /process-comment");
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::builder()
        .method("GET")
        .uri("/automation-stats")
        .body(Body::empty())
        .expect("build GET /automation-stats");
    let resp = app.oneshot(req).await.expect("oneshot /automation-stats");
    assert_eq!(resp.status(), StatusCode::OK);

    let stats = json_body(resp).await;
    assert_eq!(stats["total_processed"], 1);
    assert_eq!(stats["by_category"]["SPAM"], 1);
    assert_eq!(stats["by_platform"]["instagram"], 1);
}
