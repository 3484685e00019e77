//! File logging through the full request path.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;
use tower::ServiceExt;

use webhook_debug_receiver::{build_router, AppState, Config};

fn webhook(body: &str, secret: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::POST).uri("/webhook");
    if let Some(secret) = secret {
        builder = builder.header("X-Webhook-Secret", secret);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn read_records(path: &Path) -> Vec<Value> {
    let contents = std::fs::read_to_string(path).unwrap();
    serde_json::Deserializer::from_str(&contents)
        .into_iter::<Value>()
        .map(|r| r.unwrap())
        .collect()
}

#[tokio::test]
async fn test_every_processed_webhook_is_logged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("logs").join("webhooks.log");
    let config = Config {
        webhook_secret: Some("s3cret".into()),
        log_file: Some(path.clone()),
        console_enabled: false,
        ..Config::default()
    };
    let app = build_router(AppState::from_config(config).unwrap());

    let cases = [
        (r#"{"event_id":"1","entity_type":"order"}"#, Some("s3cret"), StatusCode::OK),
        (r#"{"batch_id":"b1","events":[{},{}]}"#, Some("s3cret"), StatusCode::OK),
        ("{}", Some("wrong"), StatusCode::FORBIDDEN),
        ("not json", Some("s3cret"), StatusCode::BAD_REQUEST),
    ];
    for (body, secret, expected) in cases {
        let response = app.clone().oneshot(webhook(body, secret)).await.unwrap();
        assert_eq!(response.status(), expected);
    }

    let records = read_records(&path);
    assert_eq!(records.len(), 4);

    assert_eq!(records[0]["level"], "INFO");
    assert_eq!(records[0]["message"], "Webhook received");
    assert_eq!(records[0]["data"]["event_id"], "1");

    assert_eq!(records[1]["message"], "Batch webhook received");
    assert_eq!(records[1]["data"]["batch_id"], "b1");

    assert_eq!(records[2]["level"], "ERROR");
    assert_eq!(records[2]["message"], "Invalid webhook secret");
    assert_eq!(records[2]["data"]["expected"], "s3cret");
    assert_eq!(records[2]["data"]["received"], "wrong");

    assert_eq!(records[3]["message"], "Invalid JSON");
    assert_eq!(records[3]["data"]["body"], "not json");
    assert!(records[3]["data"]["error"].is_string());
}

#[tokio::test]
async fn test_logging_disabled_without_path() {
    let state = AppState::from_config(Config {
        console_enabled: false,
        ..Config::default()
    })
    .unwrap();
    assert!(state.receiver.lock().await.file_logger.is_none());

    let app = build_router(state);
    let response = app.oneshot(webhook("{}", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
