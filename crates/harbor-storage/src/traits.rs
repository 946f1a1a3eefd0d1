//! Blob store abstraction trait

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid file locator: {0}")]
    InvalidLocator(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked file contents.
pub type BlobStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Where a freshly written blob ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Generated name, unique within the store
    pub stored_name: String,
    /// Locator to record with the upload
    pub file_path: String,
    pub size: u64,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `data` under a newly generated name that keeps the extension of
    /// `original_name`. Never overwrites an existing blob.
    async fn put(&self, original_name: &str, data: &[u8]) -> StorageResult<StoredBlob>;

    /// Find the file a recorded locator refers to.
    async fn resolve(&self, file_path: &str) -> StorageResult<PathBuf>;

    async fn read(&self, file_path: &str) -> StorageResult<Vec<u8>>;

    /// Stream the file in chunks instead of loading it whole.
    async fn read_stream(&self, file_path: &str) -> StorageResult<BlobStream>;

    /// Remove the file. Returns `false` if nothing was there to remove.
    async fn delete(&self, file_path: &str) -> StorageResult<bool>;
}
