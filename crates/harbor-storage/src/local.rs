use crate::names::{basename, generate_stored_name};
use crate::traits::{BlobStore, BlobStream, StorageError, StorageResult, StoredBlob};
use async_trait::async_trait;
use futures::StreamExt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Attempts at finding an unused stored name before giving up.
const NAME_ATTEMPTS: usize = 5;

/// Local filesystem blob store
#[derive(Clone, Debug)]
pub struct LocalBlobStore {
    upload_dir: PathBuf,
    legacy_dir: Option<PathBuf>,
}

impl LocalBlobStore {
    /// Create the store, making sure the upload directory exists.
    ///
    /// # Arguments
    /// * `upload_dir` - Directory new files are written to (e.g., "uploads")
    /// * `legacy_dir` - Previous upload directory still searched on reads
    pub async fn new(
        upload_dir: impl Into<PathBuf>,
        legacy_dir: Option<PathBuf>,
    ) -> StorageResult<Self> {
        let upload_dir = upload_dir.into();

        fs::create_dir_all(&upload_dir).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create upload directory {}: {}",
                upload_dir.display(),
                e
            ))
        })?;

        Ok(LocalBlobStore {
            upload_dir,
            legacy_dir,
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Paths a locator may refer to, in lookup order: an absolute locator as
    /// recorded, its file name under the upload directory, its file name under
    /// the legacy directory, then a relative locator and the bare file name
    /// against the working directory.
    pub fn candidates(&self, file_path: &str) -> StorageResult<Vec<PathBuf>> {
        let name = basename(file_path);
        if name.is_empty() || name == "." || name == ".." {
            return Err(StorageError::InvalidLocator(file_path.to_string()));
        }

        let recorded = PathBuf::from(file_path);
        let mut candidates = Vec::with_capacity(5);
        if recorded.is_absolute() {
            candidates.push(recorded.clone());
        }
        candidates.push(self.upload_dir.join(name));
        if let Some(legacy) = &self.legacy_dir {
            candidates.push(legacy.join(name));
        }
        if !recorded.is_absolute() {
            candidates.push(recorded);
        }
        candidates.push(PathBuf::from(name));
        candidates.dedup();
        Ok(candidates)
    }

    async fn write_new(&self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;

        let written = async {
            file.write_all(data).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = fs::remove_file(path).await {
                tracing::warn!(
                    path = %path.display(),
                    error = %cleanup,
                    "Failed to remove partially written file"
                );
            }
            return Err(e);
        }

        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, original_name: &str, data: &[u8]) -> StorageResult<StoredBlob> {
        let start = std::time::Instant::now();

        for _ in 0..NAME_ATTEMPTS {
            let stored_name = generate_stored_name(original_name);
            let path = self.upload_dir.join(&stored_name);

            match self.write_new(&path, data).await {
                Ok(()) => {
                    tracing::info!(
                        path = %path.display(),
                        stored_name = %stored_name,
                        size_bytes = data.len(),
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "Local blob write successful"
                    );
                    return Ok(StoredBlob {
                        file_path: stored_name.clone(),
                        stored_name,
                        size: data.len() as u64,
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(stored_name = %stored_name, "Stored name taken, regenerating");
                }
                Err(e) => {
                    return Err(StorageError::WriteFailed(format!(
                        "Failed to write file {}: {}",
                        path.display(),
                        e
                    )));
                }
            }
        }

        Err(StorageError::WriteFailed(format!(
            "No free stored name after {} attempts",
            NAME_ATTEMPTS
        )))
    }

    async fn resolve(&self, file_path: &str) -> StorageResult<PathBuf> {
        for candidate in self.candidates(file_path)? {
            if fs::metadata(&candidate)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false)
            {
                tracing::debug!(
                    file_path = %file_path,
                    resolved = %candidate.display(),
                    "Resolved blob locator"
                );
                return Ok(candidate);
            }
        }

        Err(StorageError::NotFound(file_path.to_string()))
    }

    async fn read(&self, file_path: &str) -> StorageResult<Vec<u8>> {
        let path = self.resolve(file_path).await?;
        let start = std::time::Instant::now();

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local blob read successful"
        );

        Ok(data)
    }

    async fn read_stream(&self, file_path: &str) -> StorageResult<BlobStream> {
        let path = self.resolve(file_path).await?;

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        let path_display = path.display().to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(path = %path_display, error = %e, "Local blob stream error");
                StorageError::ReadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    async fn delete(&self, file_path: &str) -> StorageResult<bool> {
        let path = match self.resolve(file_path).await {
            Ok(path) => path,
            Err(StorageError::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Local blob deleted");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
