//! End-to-end tests for the webhook receiver HTTP surface.
//!
//! Drives the real router in-process with `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use webhook_debug_receiver::{build_router, AppState, Config};

fn quiet_config() -> Config {
    Config {
        console_enabled: false,
        color: false,
        ..Config::default()
    }
}

fn app_with(config: Config) -> (Router, AppState) {
    let state = AppState::new(config, None);
    (build_router(state.clone()), state)
}

fn app() -> (Router, AppState) {
    app_with(quiet_config())
}

fn post_webhook(body: &str, secret: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/webhook")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(secret) = secret {
        builder = builder.header("X-Webhook-Secret", secret);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn assert_totals_consistent(state: &AppState) {
    let summary = state.stats_summary().await;
    assert_eq!(summary.total_requests, summary.successful + summary.failed);
}

#[tokio::test]
async fn test_health_before_any_webhook() {
    let (app, _) = app();
    let (status, body) = send_json(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "Webhook receiver is running");
    assert_eq!(body["stats"]["total_requests"], 0);
    assert_eq!(body["stats"]["successful"], 0);
    assert_eq!(body["stats"]["failed"], 0);
}

#[tokio::test]
async fn test_single_event_updates_counters() {
    let (app, state) = app();
    let (status, body) = send_json(
        &app,
        post_webhook(
            r#"{"event_id":"42","entity_type":"order","entity_id":7,"action_type":"update"}"#,
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Webhook received");
    assert_eq!(body["event_id"], "42");
    assert!(body["received_at"].is_string());

    let (_, stats) = send_json(&app, get("/stats")).await;
    assert_eq!(stats["by_entity_type"]["order"], 1);
    assert_eq!(stats["by_action_type"]["update"], 1);
    assert_eq!(stats["successful"], 1);
    assert_totals_consistent(&state).await;
}

#[tokio::test]
async fn test_batch_event_is_counted_per_event() {
    let (app, state) = app();
    let (status, body) = send_json(
        &app,
        post_webhook(
            r#"{"batch_id":"b1","events":[{"entity_type":"order","action_type":"create"},{"entity_type":"product","action_type":"update"}]}"#,
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["batch_id"], "b1");
    assert_eq!(body["events_processed"], 2);
    assert_eq!(body["results"], json!([{"success": true}, {"success": true}]));
    assert_eq!(body["message"], "Batch received with 2 events");

    let summary = state.stats_summary().await;
    assert_eq!(summary.by_entity_type["order"], 1);
    assert_eq!(summary.by_entity_type["product"], 1);
    assert_eq!(summary.by_action_type["create"], 1);
    assert_eq!(summary.by_action_type["update"], 1);
    assert_totals_consistent(&state).await;
}

#[tokio::test]
async fn test_events_without_batch_id_is_single_event() {
    let (app, state) = app();
    let (status, body) = send_json(
        &app,
        post_webhook(r#"{"items":[{"entity_type":"order"}],"batch_id":"b2"}"#, None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Webhook received");
    assert!(body.get("events_processed").is_none());
    assert_eq!(body["event_id"], Value::Null);

    let summary = state.stats_summary().await;
    assert_eq!(summary.by_entity_type["unknown"], 1);
}

#[tokio::test]
async fn test_wrong_or_missing_secret_is_forbidden() {
    let (app, state) = app_with(Config {
        webhook_secret: Some("s3cret".into()),
        ..quiet_config()
    });

    for secret in [Some("wrong"), Some("S3CRET"), None] {
        let (status, body) = send_json(&app, post_webhook(r#"{"event_id":"1"}"#, secret)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({"error": "Invalid webhook secret"}));
    }

    let summary = state.stats_summary().await;
    assert_eq!(summary.failed, 3);
    assert_eq!(summary.successful, 0);
    assert_totals_consistent(&state).await;

    let (status, _) = send_json(&app, post_webhook(r#"{"event_id":"1"}"#, Some("s3cret"))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_no_secret_accepts_any_header() {
    let (app, _) = app();
    for secret in [Some("anything"), None] {
        let (status, _) = send_json(&app, post_webhook("{}", secret)).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, state) = app();

    let (status, body) = send_json(&app, post_webhook("{not json", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid JSON"}));

    let empty = Request::builder()
        .method(Method::POST)
        .uri("/webhook")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send_json(&app, empty).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let summary = state.stats_summary().await;
    assert_eq!(summary.failed, 2);
    assert_totals_consistent(&state).await;
}

#[tokio::test]
async fn test_secret_checked_before_json() {
    let (app, state) = app_with(Config {
        webhook_secret: Some("s3cret".into()),
        ..quiet_config()
    });

    let (status, _) = send_json(&app, post_webhook("{not json", Some("wrong"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(state.stats_summary().await.failed, 1);
}

#[tokio::test]
async fn test_info_page_and_get_fallback() {
    let (app, _) = app();

    for uri in ["/", "/anything/else", "/webhook"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Debug Webhook Server"));
        assert!(html.contains("http://localhost:5000/webhook"));
    }
}

#[tokio::test]
async fn test_unknown_post_path_is_not_found() {
    let (app, state) = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/hooks")
        .body(Body::from("{}"))
        .unwrap();

    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint not found: /hooks");
    assert_eq!(state.stats_summary().await.total_requests, 0);
}

#[tokio::test]
async fn test_options_preflight_allows_cross_origin() {
    let (app, _) = app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/webhook")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,x-webhook-secret")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("POST"));
    let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
        .to_str()
        .unwrap()
        .to_lowercase();
    assert!(allowed.contains("x-webhook-secret"));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let (app, _) = app();
    let response = app.oneshot(get("/stats")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_mixed_traffic_keeps_totals_consistent() {
    let (app, state) = app_with(Config {
        webhook_secret: Some("k".into()),
        ..quiet_config()
    });

    send(&app, post_webhook(r#"{"entity_type":"order"}"#, Some("k"))).await;
    send(&app, post_webhook(r#"{"entity_type":"order"}"#, Some("x"))).await;
    send(&app, post_webhook("[", Some("k"))).await;
    send(
        &app,
        post_webhook(r#"{"batch_id":"b","events":[{},{},{}]}"#, Some("k")),
    )
    .await;

    let summary = state.stats_summary().await;
    assert_eq!(summary.successful, 4);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.total_requests, 6);
}

#[tokio::test]
async fn test_concurrent_deliveries_are_all_counted() {
    let (app, state) = app();

    let mut handles = Vec::new();
    for i in 0..20 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let body = format!(r#"{{"event_id":"{}","entity_type":"order","action_type":"create"}}"#, i);
            app.oneshot(post_webhook(&body, None)).await.unwrap().status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let summary = state.stats_summary().await;
    assert_eq!(summary.successful, 20);
    assert_eq!(summary.by_entity_type["order"], 20);
    assert_totals_consistent(&state).await;
}
