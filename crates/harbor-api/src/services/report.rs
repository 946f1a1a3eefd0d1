//! Report generation for a stored result.
//!
//! PDFs are streamed back unchanged under the report name. Everything else is
//! rendered into a new PDF on a blocking thread and streamed as it is written.

use crate::error::{storage_error, FILE_NOT_FOUND_MESSAGE};
use crate::services::results::ResultQueryService;
use crate::state::AppState;
use axum::body::Bytes;
use futures::{Stream, StreamExt};
use harbor_core::{AppError, ContentKind};
use harbor_processing::{spawn_render, ReportSource};
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use uuid::Uuid;

pub type ReportBytes = Pin<Box<dyn Stream<Item = Result<Bytes, io::Error>> + Send>>;

pub struct Report {
    /// Name offered to the client, e.g. "vessel1.pdf"
    pub filename: String,
    /// True when the stored file was already a PDF
    pub passthrough: bool,
    pub body: ReportBytes,
}

pub struct ReportService {
    state: Arc<AppState>,
}

impl ReportService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    pub async fn generate(&self, id: Uuid) -> Result<Report, AppError> {
        let row = ResultQueryService::new(&self.state).find(id).await?;
        let assessment_name = row
            .upload
            .as_ref()
            .map(|u| u.original_name.clone())
            .unwrap_or_else(|| format!("file_{}", id));
        let filename = self
            .state
            .rule
            .assess(&assessment_name, row.result.issues_detected)
            .report_filename;

        let upload = row.upload.ok_or_else(|| {
            tracing::warn!(result_id = %id, "Result has no upload record");
            AppError::NotFound(FILE_NOT_FOUND_MESSAGE.to_string())
        })?;

        let path = self.state.blobs.resolve(&upload.file_path).await.map_err(|e| {
            tracing::warn!(
                error = %e,
                result_id = %id,
                file_path = %upload.file_path,
                "Stored file could not be resolved"
            );
            storage_error(e)
        })?;

        let kind = ContentKind::classify(&upload.mime_type);
        tracing::debug!(
            result_id = %id,
            path = %path.display(),
            kind = ?kind,
            "Generating report"
        );

        if kind == ContentKind::Pdf {
            let stream = self
                .state
                .blobs
                .read_stream(&upload.file_path)
                .await
                .map_err(storage_error)?;
            let body = stream.map(|chunk| {
                chunk.map_err(|e| io::Error::other(format!("Storage stream error: {}", e)))
            });
            return Ok(Report {
                filename,
                passthrough: true,
                body: Box::pin(body),
            });
        }

        let content = match kind {
            ContentKind::Image | ContentKind::Text => self
                .state
                .blobs
                .read(&upload.file_path)
                .await
                .map_err(|e| e.to_string()),
            ContentKind::Pdf | ContentKind::Other => Ok(Vec::new()),
        };

        let source = ReportSource {
            kind,
            mime_type: upload.mime_type.clone(),
            size_bytes: upload.size.max(0) as u64,
            content,
        };

        Ok(Report {
            filename,
            passthrough: false,
            body: spawn_render(self.state.renderer, source),
        })
    }
}
