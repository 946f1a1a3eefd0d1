//! Upload ingestion: validate, store the bytes, record the upload, then
//! record its initial compliance result.

use crate::error::storage_error;
use crate::state::AppState;
use harbor_core::mime;
use harbor_core::models::{ComplianceResult, NewComplianceResult, NewUpload, Upload};
use harbor_core::AppError;
use std::sync::Arc;

/// A file received from a client, not yet persisted.
#[derive(Debug)]
pub struct IncomingFile {
    pub original_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Records created by one successful ingestion.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub upload: Upload,
    pub result: ComplianceResult,
}

pub fn invalid_type_message() -> String {
    "Invalid file type. Allowed types: txt, pdf, docx, csv, xlsx, html, jpg, jpeg, png, gif"
        .to_string()
}

pub fn too_large_message(max_mb: usize) -> String {
    format!("File too large. Maximum size is {}MB", max_mb)
}

/// Reject disallowed types and oversized files before anything is written.
pub fn validate_upload(mime_type: &str, size: usize, max_size_mb: usize) -> Result<(), AppError> {
    if !mime::is_allowed_upload_type(mime_type) {
        return Err(AppError::InvalidInput(invalid_type_message()));
    }
    if size > max_size_mb * 1024 * 1024 {
        return Err(AppError::InvalidInput(too_large_message(max_size_mb)));
    }
    Ok(())
}

pub struct IngestionService {
    state: Arc<AppState>,
}

impl IngestionService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Complete ingestion: validate → store blob → upload row → result row.
    ///
    /// The two rows are separate writes. If the result write fails, the
    /// upload row and its blob stay behind and are reported in the log.
    pub async fn ingest(&self, file: IncomingFile) -> Result<Ingested, AppError> {
        validate_upload(
            &file.mime_type,
            file.data.len(),
            self.state.config.max_upload_size_mb,
        )?;
        let mime_type = mime::normalize(&file.mime_type);

        let blob = self
            .state
            .blobs
            .put(&file.original_name, &file.data)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, original_name = %file.original_name, "Failed to store upload");
                storage_error(e)
            })?;

        let upload = match self
            .state
            .results
            .create_upload(NewUpload {
                stored_name: blob.stored_name.clone(),
                original_name: file.original_name.clone(),
                file_path: blob.file_path.clone(),
                size: blob.size as i64,
                mime_type,
            })
            .await
        {
            Ok(upload) => upload,
            Err(e) => {
                // Nothing references the blob yet, so it can go.
                if let Err(cleanup) = self.state.blobs.delete(&blob.file_path).await {
                    tracing::warn!(
                        error = %cleanup,
                        stored_name = %blob.stored_name,
                        "Failed to remove blob after upload record failed"
                    );
                }
                return Err(e);
            }
        };

        let issues_detected = self.state.rule.issue_count(&upload.original_name);
        let result = self
            .state
            .results
            .create_result(NewComplianceResult {
                upload_id: upload.id,
                issues_detected,
            })
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    error = %e,
                    upload_id = %upload.id,
                    stored_name = %upload.stored_name,
                    "Result record failed; upload record left without a result"
                );
            })?;

        tracing::info!(
            upload_id = %upload.id,
            result_id = %result.id,
            stored_name = %upload.stored_name,
            mime_type = %upload.mime_type,
            size_bytes = upload.size,
            issues_detected,
            "Upload ingested"
        );

        Ok(Ingested { upload, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_upload() {
        assert!(validate_upload("image/png", 1000, 20).is_ok());
        assert!(validate_upload("text/plain; charset=utf-8", 10, 20).is_ok());
        assert!(validate_upload("image/png", 20 * 1024 * 1024, 20).is_ok());

        let zip = validate_upload("application/zip", 10, 20).unwrap_err();
        assert!(matches!(zip, AppError::InvalidInput(msg) if msg.starts_with("Invalid file type")));

        let big = validate_upload("image/png", 25 * 1024 * 1024, 20).unwrap_err();
        assert!(matches!(big, AppError::InvalidInput(msg) if msg == "File too large. Maximum size is 20MB"));
    }
}
