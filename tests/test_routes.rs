//! HTTP route tests.
//!
//! Drives the real router through `tower::ServiceExt::oneshot` with an
//! in-memory log store and a recording mail transport, so nothing binds a
//! port or talks to an SMTP server.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use visitlog::notify::{Addresses, Notifier, RecordingTransport};
use visitlog::server::{router, AppState};
use visitlog::store::{FileLogStore, LogStore, MemoryLogStore};

struct TestApp {
    app: Router,
    store: Arc<dyn LogStore>,
    transport: Arc<RecordingTransport>,
    _public: TempDir,
}

fn setup_with(store: Arc<dyn LogStore>, transport: RecordingTransport) -> TestApp {
    let public = TempDir::new().unwrap();
    let transport = Arc::new(transport);
    let notifier = Notifier::new(
        store.clone(),
        transport.clone(),
        Addresses {
            from: "tracker@example.com".to_string(),
            to: "owner@example.com".to_string(),
        },
    );
    let app = router(AppState::new(store.clone(), notifier, public.path()));
    TestApp {
        app,
        store,
        transport,
        _public: public,
    }
}

fn setup() -> TestApp {
    setup_with(Arc::new(MemoryLogStore::new()), RecordingTransport::new())
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::USER_AGENT, "Mozilla/5.0 (X11; Linux x86_64) TestAgent/1.0")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn count(app: &Router) -> usize {
    let (status, body) = send(app, get("/get-count")).await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    value["count"].as_u64().unwrap() as usize
}

#[tokio::test]
async fn test_update_ip_records_visit() {
    let t = setup();
    assert_eq!(count(&t.app).await, 0);

    let (status, body) = send(&t.app, post_json("/update-ip", r#"{"ip":"1.2.3.4"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "IP updated successfully");

    let content = t.store.read_all().await.unwrap().unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Date,User Agent,IP");
    assert!(lines[1].ends_with(",1.2.3.4"));
    assert!(lines[1].contains("\"Mozilla/5.0 (X11; Linux x86_64) TestAgent/1.0\""));

    assert_eq!(count(&t.app).await, 1);
    // No source tag, no mail
    assert_eq!(t.transport.attempts(), 0);
}

#[tokio::test]
async fn test_update_ip_missing_body_is_rejected() {
    let t = setup();

    for body in ["", "{}", r#"{"ip":""}"#, "not json"] {
        let (status, text) = send(&t.app, post_json("/update-ip", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {:?}", body);
        assert_eq!(text, "No IP provided");
    }

    assert!(t.store.read_all().await.unwrap().is_none());
    assert_eq!(count(&t.app).await, 0);
}

#[tokio::test]
async fn test_update_ip_from_home_sends_latest_entry() {
    let t = setup();
    send(&t.app, post_json("/update-ip", r#"{"ip":"1.1.1.1"}"#)).await;

    let (status, body) = send(
        &t.app,
        post_json("/update-ip?source=home", r#"{"ip":"2.2.2.2"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "IP updated successfully and email sent");

    let sent = t.transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.ends_with(",2.2.2.2"));
    assert_eq!(sent[0].to, "owner@example.com");
}

#[tokio::test]
async fn test_mail_failure_does_not_fail_request() {
    let t = setup_with(
        Arc::new(MemoryLogStore::new()),
        RecordingTransport::failing("authentication failed"),
    );

    let (status, body) = send(
        &t.app,
        post_json("/update-ip?source=home", r#"{"ip":"3.3.3.3"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "IP updated successfully");
    assert_eq!(t.transport.attempts(), 1);
    assert_eq!(count(&t.app).await, 1);
}

#[tokio::test]
async fn test_other_source_does_not_notify() {
    let t = setup();
    let (status, _) = send(
        &t.app,
        post_json("/update-ip?source=direct", r#"{"ip":"4.4.4.4"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(t.transport.attempts(), 0);
}

#[tokio::test]
async fn test_log_click_appends_verbatim() {
    let t = setup();
    let row = "2024-01-01T00:00:00Z,\"UA\",5.6.7.8\n";
    let payload = serde_json::json!({ "csvData": row }).to_string();

    let (status, body) = send(&t.app, post_json("/log-click", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Data logged successfully");

    let response = t.app.clone().oneshot(get("/get-data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/csv"));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let data = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(data.starts_with("Date,User Agent,IP\n"));
    assert!(data.ends_with(row));
}

#[tokio::test]
async fn test_log_click_missing_data_is_rejected() {
    let t = setup();
    let (status, body) = send(&t.app, post_json("/log-click", r#"{"other":"x"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "No data received");
    assert!(t.store.read_all().await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_data_without_log_is_not_found() {
    let t = setup();
    let (status, body) = send(&t.app, get("/get-data")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "No data found");
}

#[tokio::test]
async fn test_home_redirects_with_source_tag() {
    let t = setup();
    let response = t.app.clone().oneshot(get("/home")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/?source=home");
}

#[tokio::test]
async fn test_landing_page_is_served() {
    let t = setup();
    let (status, body) = send(&t.app, get("/?source=home")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/update-ip"));
}

#[tokio::test]
async fn test_public_dir_overrides_and_serves_static_files() {
    let t = setup();
    std::fs::write(t._public.path().join("index.html"), "<h1>custom</h1>").unwrap();
    std::fs::write(t._public.path().join("about.html"), "<h1>about</h1>").unwrap();

    let (status, body) = send(&t.app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>custom</h1>");

    let (status, body) = send(&t.app, get("/about.html")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>about</h1>");

    let (status, _) = send(&t.app, get("/missing.html")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_storage_failure_is_500() {
    let dir = TempDir::new().unwrap();
    // The log path is a directory, so every read and write fails
    let store: Arc<dyn LogStore> = Arc::new(FileLogStore::new(dir.path()));
    let t = setup_with(store, RecordingTransport::new());

    let (status, body) = send(&t.app, post_json("/update-ip", r#"{"ip":"1.2.3.4"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error logging data");

    let (status, body) = send(&t.app, get("/get-count")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#"{"error":"Error reading data"}"#);

    let (status, body) = send(&t.app, get("/get-data")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error retrieving data");
}

#[tokio::test]
async fn test_file_backed_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("user_data.csv");
    let store: Arc<dyn LogStore> = Arc::new(FileLogStore::new(&path));
    let t = setup_with(store, RecordingTransport::new());

    for ip in ["10.0.0.1", "10.0.0.2", "10.0.0.3"] {
        let body = serde_json::json!({ "ip": ip }).to_string();
        let (status, _) = send(&t.app, post_json("/update-ip", &body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(count(&t.app).await, 3);
    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk.lines().count(), 4);
    assert!(on_disk.lines().last().unwrap().ends_with(",10.0.0.3"));
}
