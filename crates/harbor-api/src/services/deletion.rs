//! Result deletion: blob, then upload row, then result row.

use crate::services::results::ResultQueryService;
use crate::state::AppState;
use harbor_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// What a deletion actually removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub blob_removed: bool,
    pub upload_removed: bool,
    pub result_removed: bool,
}

pub struct DeletionService {
    state: Arc<AppState>,
}

impl DeletionService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Delete a result with its upload and blob.
    ///
    /// A blob that cannot be removed is logged and skipped. A missing upload
    /// does not stop the result from being deleted.
    pub async fn delete(&self, id: Uuid) -> Result<DeletionOutcome, AppError> {
        let row = ResultQueryService::new(&self.state).find(id).await?;
        let mut outcome = DeletionOutcome::default();

        if let Some(upload) = &row.upload {
            match self.state.blobs.delete(&upload.file_path).await {
                Ok(removed) => {
                    outcome.blob_removed = removed;
                    if !removed {
                        tracing::debug!(file_path = %upload.file_path, "No blob to delete");
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        result_id = %id,
                        file_path = %upload.file_path,
                        "Could not delete file, continuing"
                    );
                }
            }

            outcome.upload_removed = self.state.results.delete_upload(upload.id).await?;
        }

        // The upload delete may already have cascaded to the result row.
        outcome.result_removed = self.state.results.delete_result(id).await?;

        tracing::info!(
            result_id = %id,
            blob_removed = outcome.blob_removed,
            upload_removed = outcome.upload_removed,
            "Result deleted"
        );

        Ok(outcome)
    }
}
