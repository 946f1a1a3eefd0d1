use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Upload;

/// Compliance outcome recorded for one upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub id: Uuid,
    /// `None` only if the upload row vanished underneath the result
    pub upload_id: Option<Uuid>,
    pub configured: bool,
    pub issues_detected: i32,
    pub report_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComplianceResult {
    pub upload_id: Uuid,
    pub issues_detected: i32,
}

/// A result joined with its upload. The upload side is optional.
#[derive(Debug, Clone)]
pub struct ResultWithUpload {
    pub result: ComplianceResult,
    pub upload: Option<Upload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultResponse {
    pub id: Uuid,
    pub upload_id: Option<Uuid>,
    pub configured: bool,
    pub issues_detected: i32,
    pub report_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ComplianceResult> for ResultResponse {
    fn from(result: ComplianceResult) -> Self {
        ResultResponse {
            id: result.id,
            upload_id: result.upload_id,
            configured: result.configured,
            issues_detected: result.issues_detected,
            report_path: result.report_path,
            created_at: result.created_at,
            updated_at: result.updated_at,
        }
    }
}

/// Row of the results listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResultView {
    pub id: Uuid,
    /// Original file name, or "Unknown" when the upload is missing
    pub filename: String,
    #[serde(rename = "vesselName")]
    pub vessel_name: String,
    pub image_url: Option<String>,
    pub configured: bool,
    pub issues_detected: i32,
    pub is_compliant: bool,
    pub report_filename: String,
    pub created_at: DateTime<Utc>,
}

/// Single-result view: the listing row plus the record's own fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResultDetail {
    #[serde(flatten)]
    pub view: ResultView,
    #[serde(rename = "uploadId")]
    pub upload_id: Option<Uuid>,
    #[serde(rename = "reportPath")]
    pub report_path: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "fileSize")]
    pub file_size: Option<i64>,
    #[serde(rename = "fileType")]
    pub file_type: Option<String>,
}
