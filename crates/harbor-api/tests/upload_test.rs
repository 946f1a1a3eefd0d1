//! Upload ingestion integration tests.
//!
//! Run with: `cargo test -p harbor-api --test upload_test`

mod helpers;

use helpers::fixtures;
use helpers::{setup_test_app, setup_test_app_with, upload};

#[tokio::test]
async fn test_upload_iteration1_png() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = upload(client, "iteration1.png", "image/png", fixtures::create_png_of_size(1000)).await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "File uploaded successfully");
    assert_eq!(body["upload"]["originalFilename"], "iteration1.png");
    assert_eq!(body["upload"]["fileSize"], 1000);
    assert_eq!(body["upload"]["fileType"], "image/png");
    assert_eq!(body["result"]["issuesDetected"], 4);
    assert_eq!(body["result"]["configured"], false);
    assert_eq!(body["result"]["uploadId"], body["upload"]["id"]);

    let stored = body["upload"]["filename"].as_str().unwrap();
    assert!(stored.starts_with("file-"));
    assert!(stored.ends_with(".png"));

    let files = app.stored_files();
    assert_eq!(files.len(), 1);
    assert_eq!(std::fs::metadata(&files[0]).unwrap().len(), 1000);
}

#[tokio::test]
async fn test_upload_iteration2_has_no_issues() {
    let app = setup_test_app().await;

    let response = upload(app.client(), "iteration2.png", "image/png", fixtures::create_test_png(8, 8)).await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["result"]["issuesDetected"], 0);
}

#[tokio::test]
async fn test_upload_other_name_gets_bounded_count() {
    let app = setup_test_app().await;

    for _ in 0..5 {
        let response = upload(app.client(), "deck-photo.png", "image/png", fixtures::create_test_png(2, 2)).await;
        let body: serde_json::Value = response.json();
        let issues = body["result"]["issuesDetected"].as_i64().unwrap();
        assert!((0..=4).contains(&issues));
    }
}

#[tokio::test]
async fn test_upload_without_file_is_rejected() {
    let app = setup_test_app().await;

    let form = axum_test::multipart::MultipartForm::new().add_text("note", "no file here");
    let response = app.client().post("/api/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No file uploaded");
}

#[tokio::test]
async fn test_non_multipart_body_gets_json_error() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload")
        .json(&serde_json::json!({ "file": "x" }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(response
        .header("content-type")
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No file uploaded");
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(app.store.upload_count(), 0);
}

#[tokio::test]
async fn test_empty_body_without_content_type_gets_json_error() {
    let app = setup_test_app().await;

    let response = app.client().post("/api/upload").await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No file uploaded");
}

#[tokio::test]
async fn test_disallowed_type_creates_nothing() {
    let app = setup_test_app().await;

    let response = upload(app.client(), "bundle.zip", "application/zip", vec![0x50, 0x4B, 0x03, 0x04]).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid file type"));
    assert_eq!(app.store.upload_count(), 0);
    assert_eq!(app.store.result_count(), 0);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_oversized_upload_is_rejected_before_any_write() {
    let app = setup_test_app().await;

    let data = vec![b'a'; 25 * 1024 * 1024];
    let response = upload(app.client(), "huge.txt", "text/plain", data).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "File too large. Maximum size is 20MB");
    assert_eq!(app.store.upload_count(), 0);
    assert_eq!(app.store.result_count(), 0);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_size_cap_follows_config() {
    let app = setup_test_app_with(|config| config.max_upload_size_mb = 1).await;

    let ok = upload(app.client(), "small.txt", "text/plain", vec![b'a'; 1024 * 1024]).await;
    assert_eq!(ok.status_code(), 200);

    let too_big = upload(app.client(), "big.txt", "text/plain", vec![b'a'; 1024 * 1024 + 1]).await;
    assert_eq!(too_big.status_code(), 400);
    assert_eq!(app.store.upload_count(), 1);
}

#[tokio::test]
async fn test_store_unavailable_is_503_and_leaves_no_blob() {
    let app = setup_test_app().await;
    app.store.set_unavailable(true);

    let response = upload(app.client(), "notes.txt", "text/plain", fixtures::readme_text()).await;

    assert_eq!(response.status_code(), 503);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "STORE_UNAVAILABLE");
    assert!(body["suggested_action"].is_string());
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_failed_result_write_leaves_upload_row() {
    let app = setup_test_app().await;
    app.store.fail_result_inserts(true);

    let response = upload(app.client(), "notes.txt", "text/plain", fixtures::readme_text()).await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(app.store.upload_count(), 1);
    assert_eq!(app.store.result_count(), 0);
    assert_eq!(app.stored_files().len(), 1);
}

#[tokio::test]
async fn test_uploaded_file_is_served_statically() {
    let app = setup_test_app().await;
    let png = fixtures::create_test_png(3, 3);

    helpers::upload_ok(app.client(), "hull.png", "image/png", png.clone()).await;

    let list: serde_json::Value = app.client().get("/api/results").await.json();
    let image_url = list["results"][0]["image_url"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("/uploads/file-"));

    let response = app.client().get(&image_url).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().to_vec(), png);
}
