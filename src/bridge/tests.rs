//! Bridge tests against an in-process mock backend

use super::*;
use crate::sink::{ChatLog, NoticeLevel};
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Requests seen by the mock backend: (path, body)
type Recorded = Arc<Mutex<Vec<(String, Value)>>>;

async fn record(
    State(recorded): State<Recorded>,
    uri: Uri,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorded
        .lock()
        .unwrap()
        .push((uri.path().to_string(), body.clone()));

    let reply = match uri.path() {
        "/analyze" => json!({ "analysis": "This prints 1" }),
        "/quiz" => json!({ "quiz": "Q1. What is a tuple?" }),
        "/followup" => json!({ "answer": "a\nb" }),
        "/docs" => json!({ "summary": "requests is an HTTP library", "sources": [{"doc": 1}] }),
        _ => json!({}),
    };
    Json(reply)
}

/// Start a mock backend on an ephemeral port; returns its base address
async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/", addr)
}

async fn recording_backend() -> (String, Recorded) {
    let recorded: Recorded = Arc::default();
    let router = Router::new()
        .route("/analyze", post(record))
        .route("/quiz", post(record))
        .route("/followup", post(record))
        .route("/docs", post(record))
        .with_state(recorded.clone());
    (spawn_backend(router).await, recorded)
}

fn bridge_for(base_url: &str) -> Bridge {
    Bridge::new(&BackendConfig {
        base_url: base_url.to_string(),
        ..BackendConfig::default()
    })
    .unwrap()
}

/// Base address of a port nothing listens on
async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[test]
fn test_url_joining_ignores_trailing_slash() {
    let with_slash = bridge_for("http://127.0.0.1:8000/");
    let without = bridge_for("http://127.0.0.1:8000");
    assert_eq!(with_slash.url_for(Endpoint::Analyze), "http://127.0.0.1:8000/analyze");
    assert_eq!(without.url_for(Endpoint::Followup), "http://127.0.0.1:8000/followup");
}

#[test]
fn test_payload_serializes_as_flat_object() {
    let payload = Payload::new()
        .with("code", "print(1)")
        .with("error_output", "Traceback");
    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        json!({ "code": "print(1)", "error_output": "Traceback" })
    );
    assert_eq!(payload.get_str("code"), Some("print(1)"));
    assert!(!payload.contains_key("question"));
}

#[tokio::test]
async fn test_analyze_round_trip() {
    let (base, recorded) = recording_backend().await;
    let bridge = bridge_for(&base);
    let log = ChatLog::new();

    bridge
        .send(Endpoint::Analyze, &Payload::new().with("code", "print(1)"), &log)
        .await;

    assert_eq!(log.tutor_texts(), vec![THINKING_PLACEHOLDER, "This prints 1"]);
    assert!(log.notices().is_empty());

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].0, "/analyze");
    assert_eq!(recorded[0].1, json!({ "code": "print(1)" }));
}

#[tokio::test]
async fn test_multiline_reply_uses_line_breaks() {
    let (base, _) = recording_backend().await;
    let bridge = bridge_for(&base);
    let log = ChatLog::new();

    bridge
        .send(Endpoint::Followup, &Payload::new().with("question", "why?"), &log)
        .await;

    let last = log.tutor_texts().pop().unwrap();
    assert!(!last.contains('\n'));
    assert_eq!(last, "a<br>b");
}

#[tokio::test]
async fn test_request_decodes_tagged_reply() {
    let (base, _) = recording_backend().await;
    let bridge = bridge_for(&base);

    let quiz = bridge
        .request(Endpoint::Quiz, &Payload::new().with("code_or_topic", "tuples"))
        .await
        .unwrap();
    assert_eq!(quiz, Reply::Quiz("Q1. What is a tuple?".to_string()));

    let docs = bridge
        .request(Endpoint::Docs, &Payload::new().with("library_name", "requests"))
        .await
        .unwrap();
    assert_eq!(docs.text(), "requests is an HTTP library");
}

#[tokio::test]
async fn test_connection_failure_names_base_address() {
    let base = dead_address().await;
    let bridge = bridge_for(&base);
    let log = ChatLog::new();

    bridge
        .send(Endpoint::Analyze, &Payload::new().with("code", "x"), &log)
        .await;

    let texts = log.tutor_texts();
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0], THINKING_PLACEHOLDER);
    assert!(texts[1].contains(&base), "error entry should name {}", base);

    let notices = log.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, FAILURE_NOTICE);

    assert!(matches!(
        bridge.request(Endpoint::Analyze, &Payload::new()).await,
        Err(BridgeError::Transport(_))
    ));
}

#[tokio::test]
async fn test_non_success_status_is_a_failure() {
    let router = Router::new().route(
        "/quiz",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
    );
    let base = spawn_backend(router).await;
    let bridge = bridge_for(&base);
    let log = ChatLog::new();

    bridge.send(Endpoint::Quiz, &Payload::new(), &log).await;

    let last = log.tutor_texts().pop().unwrap();
    assert_eq!(last, bridge.failure_display());
    assert!(!last.contains("Internal Server Error"));
    assert_eq!(log.notices().len(), 1);

    match bridge.request(Endpoint::Quiz, &Payload::new()).await {
        Err(BridgeError::Status { status, reason }) => {
            assert_eq!(status, 500);
            assert_eq!(reason, "Internal Server Error");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unparseable_body_is_a_failure() {
    let router = Router::new().route("/followup", post(|| async { "definitely not json" }));
    let base = spawn_backend(router).await;
    let bridge = bridge_for(&base);

    assert!(matches!(
        bridge.request(Endpoint::Followup, &Payload::new()).await,
        Err(BridgeError::Decode(_))
    ));
}

#[tokio::test]
async fn test_missing_fields_show_empty_string() {
    let router = Router::new().route(
        "/analyze",
        post(|| async { Json(json!({ "detail": "nothing to say" })) }),
    );
    let base = spawn_backend(router).await;
    let bridge = bridge_for(&base);
    let log = ChatLog::new();

    bridge.send(Endpoint::Analyze, &Payload::new(), &log).await;

    assert_eq!(log.tutor_texts(), vec![THINKING_PLACEHOLDER, ""]);
    assert!(log.notices().is_empty());
}

#[tokio::test]
async fn test_probe_reports_status() {
    let router = Router::new().route("/", get(|| async { "ok" }));
    let base = spawn_backend(router).await;
    assert_eq!(bridge_for(&base).probe().await.unwrap(), StatusCode::OK);

    // A 404 still proves the backend is up
    let base = spawn_backend(Router::new()).await;
    assert_eq!(bridge_for(&base).probe().await.unwrap(), StatusCode::NOT_FOUND);

    let base = dead_address().await;
    assert!(bridge_for(&base).probe().await.is_err());
}
