//! Test helpers: build AppState and router for integration tests.
//!
//! The router is the production one; only the stores differ. Results and
//! requirements live in `harbor_db::memory::InMemoryStore` and blobs in a
//! temporary directory, so these tests need neither Postgres nor Docker.
//!
//! Run with: `cargo test -p harbor-api`

#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use harbor_api::setup::routes;
use harbor_api::state::AppState;
use harbor_core::{Config, FilenamePatternRule};
use harbor_db::memory::InMemoryStore;
use harbor_storage::{BlobStore, LocalBlobStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server, in-memory store and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub store: InMemoryStore,
    pub config: Config,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_dir(&self) -> &Path {
        &self.config.upload_dir
    }

    pub fn legacy_dir(&self) -> PathBuf {
        self.config
            .legacy_upload_dir
            .clone()
            .expect("test config has a legacy dir")
    }

    /// Files currently in the upload directory.
    pub fn stored_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.upload_dir())
            .expect("upload dir exists")
            .map(|entry| entry.expect("dir entry").path())
            .collect()
    }
}

pub fn test_config(root: &Path) -> Config {
    Config {
        database_url: "postgres://unused@localhost/harbor".to_string(),
        upload_dir: root.join("uploads"),
        legacy_upload_dir: Some(root.join("backend").join("uploads")),
        ..Config::default()
    }
}

/// Setup test app with an in-memory store and temp-dir blob storage.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

pub async fn setup_test_app_with(adjust: impl FnOnce(&mut Config)) -> TestApp {
    setup_test_app_with_blobs(adjust, |local| Arc::new(local) as Arc<dyn BlobStore>).await
}

/// Like [`setup_test_app_with`], with the temp-dir blob store wrapped by
/// `wrap`, e.g. in a double that fails some operations.
pub async fn setup_test_app_with_blobs(
    adjust: impl FnOnce(&mut Config),
    wrap: impl FnOnce(LocalBlobStore) -> Arc<dyn BlobStore>,
) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = test_config(temp_dir.path());
    adjust(&mut config);

    if let Some(legacy) = &config.legacy_upload_dir {
        std::fs::create_dir_all(legacy).expect("Failed to create legacy dir");
    }

    let store = InMemoryStore::new();
    let blobs = LocalBlobStore::new(&config.upload_dir, config.legacy_upload_dir.clone())
        .await
        .expect("Failed to create blob store");

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        wrap(blobs),
        Arc::new(FilenamePatternRule),
    ));

    let app = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        store,
        config,
        _temp_dir: temp_dir,
    }
}

/// POST one file to `/api/upload`.
pub async fn upload(
    client: &TestServer,
    file_name: &str,
    mime_type: &str,
    data: Vec<u8>,
) -> TestResponse {
    let part = Part::bytes(data).file_name(file_name).mime_type(mime_type);
    client
        .post("/api/upload")
        .multipart(MultipartForm::new().add_part("file", part))
        .await
}

/// Upload and return the new result's id.
pub async fn upload_ok(
    client: &TestServer,
    file_name: &str,
    mime_type: &str,
    data: Vec<u8>,
) -> String {
    let response = upload(client, file_name, mime_type, data).await;
    assert_eq!(response.status_code(), 200, "upload failed: {}", response.text());
    let body: serde_json::Value = response.json();
    body["result"]["id"]
        .as_str()
        .expect("Expected result id in upload response")
        .to_string()
}

/// Text of every page, with content streams decompressed.
pub fn pdf_page_contents(bytes: &[u8]) -> Vec<String> {
    let mut doc = lopdf::Document::load_mem(bytes).expect("response is a valid PDF");
    doc.decompress();
    doc.get_pages()
        .values()
        .map(|page_id| {
            let content = doc.get_page_content(*page_id).expect("page content");
            String::from_utf8_lossy(&content).into_owned()
        })
        .collect()
}
