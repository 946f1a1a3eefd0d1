use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Reference text shown alongside results. Not linked to uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequirementResponse {
    pub id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Requirement> for RequirementResponse {
    fn from(requirement: Requirement) -> Self {
        RequirementResponse {
            id: requirement.id,
            description: requirement.description,
            created_at: requirement.created_at,
        }
    }
}

/// Request DTO for creating a requirement
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateRequirementRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

/// Requirements inserted when the store starts out empty.
pub const DEFAULT_REQUIREMENTS: [&str; 13] = [
    "Maximum file size per upload is 20 MB.",
    "Supported file formats: txt, pdf, docx, csv, xlsx, html, jpg, jpeg, png, gif.",
    "Multiple files can be selected and uploaded simultaneously.",
    "Upload progress is displayed in real-time for each file.",
    "Image files (jpg, jpeg, png, gif) are automatically embedded in PDF format when downloaded.",
    "Text files (txt, csv, html) are converted to PDF with preserved content when downloaded.",
    "PDF files are downloaded as-is without any conversion or modification.",
    "Downloaded files maintain the original filename with .pdf extension.",
    "Files can be deleted from the results page using the delete button.",
    "Uploaded files are stored securely on the server until deleted.",
    "Image preview is available for image files during upload.",
    "File information including name, size, and type is displayed in the results table.",
    "All uploaded files can be downloaded in PDF format from the results page.",
];
