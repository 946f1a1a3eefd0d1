//! Result queries and the client-facing views derived from them.

use crate::state::AppState;
use harbor_core::models::{ResultDetail, ResultView, ResultWithUpload};
use harbor_core::{AppError, ComplianceRule};
use std::sync::Arc;
use uuid::Uuid;

/// Stand-in name for a result whose upload row is gone.
pub const UNKNOWN_FILENAME: &str = "Unknown";

/// Build the listing row for one joined result.
///
/// The compliance rule decides the vessel label and may override the stored
/// issue count; a missing upload yields "Unknown" and no image URL.
pub fn derive_view(
    rule: &dyn ComplianceRule,
    row: &ResultWithUpload,
    public_uploads_path: &str,
) -> ResultView {
    let filename = row
        .upload
        .as_ref()
        .map(|u| u.original_name.clone())
        .unwrap_or_else(|| UNKNOWN_FILENAME.to_string());
    let assessment = rule.assess(&filename, row.result.issues_detected);

    let image_url = row.upload.as_ref().map(|u| {
        format!(
            "{}/{}",
            public_uploads_path.trim_end_matches('/'),
            u.file_basename()
        )
    });

    ResultView {
        id: row.result.id,
        filename,
        vessel_name: assessment.vessel_name,
        image_url,
        configured: row.result.configured,
        issues_detected: assessment.issues_detected,
        is_compliant: assessment.is_compliant,
        report_filename: assessment.report_filename,
        created_at: row.result.created_at,
    }
}

/// Listing row plus the raw record and upload fields.
pub fn derive_detail(
    rule: &dyn ComplianceRule,
    row: &ResultWithUpload,
    public_uploads_path: &str,
) -> ResultDetail {
    let view = derive_view(rule, row, public_uploads_path);
    let upload = row.upload.as_ref();

    ResultDetail {
        view,
        upload_id: row.result.upload_id,
        report_path: row.result.report_path.clone(),
        updated_at: row.result.updated_at,
        file_path: upload.map(|u| u.file_path.clone()),
        file_size: upload.map(|u| u.size),
        file_type: upload.map(|u| u.mime_type.clone()),
    }
}

pub struct ResultQueryService {
    state: Arc<AppState>,
}

impl ResultQueryService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// All results, newest first.
    pub async fn list(&self) -> Result<Vec<ResultView>, AppError> {
        let rows = self.state.results.list_results().await?;
        let public = &self.state.config.public_uploads_path;

        Ok(rows
            .iter()
            .map(|row| derive_view(self.state.rule.as_ref(), row, public))
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<ResultDetail, AppError> {
        let row = self.find(id).await?;
        Ok(derive_detail(
            self.state.rule.as_ref(),
            &row,
            &self.state.config.public_uploads_path,
        ))
    }

    /// The joined row, or `NotFound`.
    pub async fn find(&self, id: Uuid) -> Result<ResultWithUpload, AppError> {
        self.state
            .results
            .get_result(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Result not found".to_string()))
    }
}
