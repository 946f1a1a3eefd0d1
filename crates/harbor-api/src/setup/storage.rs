//! Storage setup and initialization

use anyhow::{Context, Result};
use harbor_core::Config;
use harbor_storage::{BlobStore, LocalBlobStore};
use std::sync::Arc;

/// Create the local blob store rooted at the configured upload directory.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn BlobStore>> {
    tracing::info!("Initializing blob storage...");
    let store = LocalBlobStore::new(&config.upload_dir, config.legacy_upload_dir.clone())
        .await
        .context("Failed to initialize blob storage")?;

    tracing::info!(
        upload_dir = %config.upload_dir.display(),
        legacy_dir = ?config.legacy_upload_dir,
        "Blob storage initialized successfully"
    );

    Ok(Arc::new(store))
}
