//! Health, readiness and API docs endpoints.
//!
//! Run with: `cargo test -p harbor-api --test health_test`

mod helpers;

use helpers::setup_test_app;

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "Server is running");
}

#[tokio::test]
async fn test_readiness_follows_store() {
    let app = setup_test_app().await;

    let ready = app.client().get("/api/health/ready").await;
    assert_eq!(ready.status_code(), 200);
    let body: serde_json::Value = ready.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["database"], "ready");

    app.store.set_unavailable(true);
    let down = app.client().get("/api/health/ready").await;
    assert_eq!(down.status_code(), 503);
    let body: serde_json::Value = down.json();
    assert_eq!(body["status"], "not_ready");
    assert!(body["database"]
        .as_str()
        .unwrap()
        .starts_with("not_ready: "));
}

#[tokio::test]
async fn test_liveness_ignores_store_outage() {
    let app = setup_test_app().await;
    app.store.set_unavailable(true);

    let response = app.client().get("/api/health").await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/api/upload"].is_object());
    assert!(body["paths"]["/api/results/{id}/download"].is_object());
}
