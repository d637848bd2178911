//! Integration tests for the Orbital Server API

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use orbital_core::storage::LocalStorage;
use orbital_core::{CatalogFile, CatalogIndex};
use orbital_server::routes::create_router;
use orbital_server::state::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

const USER_HEADER: HeaderName = HeaderName::from_static("x-user-id");

fn user(id: &'static str) -> HeaderValue {
    HeaderValue::from_static(id)
}

/// Create a test app state with temporary storage
async fn create_test_state() -> (AppState, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage_path = temp_dir.path().to_path_buf();

    let storage = Arc::new(LocalStorage::new(&storage_path));
    let catalog = Arc::new(CatalogFile::new(storage_path.join("catalog.json")));

    (AppState::with_storage(storage, catalog), temp_dir)
}

/// Create a test server
async fn create_test_server() -> (TestServer, TempDir) {
    let (state, temp_dir) = create_test_state().await;
    let app = create_router(state);
    let server = TestServer::new(app).expect("Failed to create test server");
    (server, temp_dir)
}

fn entry(book: &str, progress: i64, last_read_at: &str) -> Value {
    json!({ "bookId": book, "progress": progress, "lastReadAt": last_read_at })
}

async fn sync(server: &TestServer, user_id: &'static str, entries: Vec<Value>) -> axum_test::TestResponse {
    server
        .post("/api/v1/progress/sync")
        .add_header(USER_HEADER, user(user_id))
        .json(&json!({ "progresses": entries }))
        .await
}

async fn progress(server: &TestServer, user_id: &'static str) -> Value {
    let response = server
        .get("/api/v1/progress")
        .add_header(USER_HEADER, user(user_id))
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn test_health_check() {
    let (server, _temp_dir) = create_test_server().await;

    let response = server.get("/health").await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_sync_requires_identity() {
    let (server, _temp_dir) = create_test_server().await;

    let response = server
        .post("/api/v1/progress/sync")
        .json(&json!({ "progresses": [] }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "unauthenticated");
}

#[tokio::test]
async fn test_blank_identity_is_rejected() {
    let (server, _temp_dir) = create_test_server().await;

    let response = server
        .get("/api/v1/stats")
        .add_header(USER_HEADER, user("   "))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sync_returns_no_content() {
    let (server, _temp_dir) = create_test_server().await;

    let response = sync(&server, "alice", vec![entry("dune", 40, "2024-05-01T12:00:00Z")]).await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(response.text().is_empty());

    let body = progress(&server, "alice").await;
    assert_eq!(body["progresses"][0]["bookId"], "dune");
    assert_eq!(body["progresses"][0]["progress"], 40);
    assert_eq!(body["progresses"][0]["lastReadAt"], "2024-05-01T12:00:00Z");
}

#[tokio::test]
async fn test_last_write_wins_over_http() {
    let (server, _temp_dir) = create_test_server().await;

    sync(&server, "alice", vec![entry("dune", 60, "2024-05-02T00:00:00Z")])
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // Older device snapshot arrives late
    sync(&server, "alice", vec![entry("dune", 20, "2024-05-01T00:00:00Z")])
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let body = progress(&server, "alice").await;
    assert_eq!(body["progresses"][0]["progress"], 60);

    // Same instant from another device keeps the stored value
    sync(&server, "alice", vec![entry("dune", 99, "2024-05-02T00:00:00Z")])
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let body = progress(&server, "alice").await;
    assert_eq!(body["progresses"][0]["progress"], 60);
}

#[tokio::test]
async fn test_resync_is_idempotent() {
    let (server, _temp_dir) = create_test_server().await;
    let batch = vec![
        entry("dune", 40, "2024-05-01T12:00:00Z"),
        entry("solaris", 100, "2024-05-01T13:00:00Z"),
    ];

    sync(&server, "alice", batch.clone()).await;
    let once = progress(&server, "alice").await;

    sync(&server, "alice", batch).await;
    let twice = progress(&server, "alice").await;

    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_out_of_range_progress_rejects_batch() {
    let (server, _temp_dir) = create_test_server().await;

    sync(&server, "alice", vec![entry("dune", 40, "2024-05-01T12:00:00Z")]).await;
    let before = progress(&server, "alice").await;

    for bad in [-1, 101] {
        let response = sync(
            &server,
            "alice",
            vec![
                entry("dune", 90, "2024-06-01T12:00:00Z"),
                entry("solaris", bad, "2024-06-01T12:00:00Z"),
            ],
        )
        .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "validation");
        assert_eq!(body["bookId"], "solaris");
        assert!(body["reason"].as_str().unwrap().contains("outside 0..=100"));
    }

    assert_eq!(progress(&server, "alice").await, before);
}

#[tokio::test]
async fn test_progress_beyond_integer_range_names_the_book() {
    let (server, _temp_dir) = create_test_server().await;

    let response = server
        .post("/api/v1/progress/sync")
        .add_header(USER_HEADER, user("alice"))
        .json(&json!({
            "progresses": [{
                "bookId": "dune",
                "progress": 10_000_000_000_000_000_000u64,
                "lastReadAt": "2024-05-01T12:00:00Z"
            }]
        }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"], "validation");
    assert_eq!(body["bookId"], "dune");

    let body = progress(&server, "alice").await;
    assert_eq!(body["progresses"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let (server, _temp_dir) = create_test_server().await;

    let response = server
        .post("/api/v1/progress/sync")
        .add_header(USER_HEADER, user("alice"))
        .json(&json!({ "progresses": [{ "bookId": "dune" }] }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_users_do_not_see_each_other() {
    let (server, _temp_dir) = create_test_server().await;

    sync(&server, "alice", vec![entry("dune", 40, "2024-05-01T12:00:00Z")]).await;

    let body = progress(&server, "bob").await;
    assert_eq!(body["progresses"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_stats_empty() {
    let (server, _temp_dir) = create_test_server().await;

    let response = server
        .get("/api/v1/stats")
        .add_header(USER_HEADER, user("alice"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["booksRead"], 0);
    assert_eq!(body["booksPublished"], 0);
    assert_eq!(body["totalReadingHours"], 0.0);
}

#[tokio::test]
async fn test_stats_scenario() {
    let (server, temp_dir) = create_test_server().await;

    // One book uploaded by alice, one by someone else
    let catalog: CatalogIndex = serde_json::from_value(json!({
        "books": {
            "manuscript": {
                "id": "manuscript",
                "title": "My Manuscript",
                "author": "Alice",
                "uploaderId": "alice",
                "uploadedAt": "2024-04-01T00:00:00Z"
            },
            "other": {
                "id": "other",
                "title": "Not Mine",
                "author": "Bob",
                "uploaderId": "bob",
                "uploadedAt": "2024-04-01T00:00:00Z"
            }
        }
    }))
    .unwrap();
    std::fs::write(
        temp_dir.path().join("catalog.json"),
        serde_json::to_string(&catalog).unwrap(),
    )
    .unwrap();

    sync(
        &server,
        "alice",
        vec![
            entry("a", 100, "2024-05-01T12:00:00Z"),
            entry("b", 40, "2024-05-01T12:00:00Z"),
        ],
    )
    .await
    .assert_status(StatusCode::NO_CONTENT);

    let response = server
        .get("/api/v1/stats")
        .add_header(USER_HEADER, user("alice"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["booksRead"], 1);
    assert_eq!(body["booksPublished"], 1);
    let hours = body["totalReadingHours"].as_f64().unwrap();
    assert!((hours - 14.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_authoritative_documents_survive_restart() {
    let (state, temp_dir) = create_test_state().await;
    let server = TestServer::new(create_router(state)).unwrap();
    sync(&server, "alice", vec![entry("dune", 40, "2024-05-01T12:00:00Z")]).await;
    drop(server);

    let storage = Arc::new(LocalStorage::new(temp_dir.path()));
    let catalog = Arc::new(CatalogFile::new(temp_dir.path().join("catalog.json")));
    let restarted = TestServer::new(create_router(AppState::with_storage(storage, catalog))).unwrap();

    let body = progress(&restarted, "alice").await;
    assert_eq!(body["progresses"][0]["progress"], 40);
}
