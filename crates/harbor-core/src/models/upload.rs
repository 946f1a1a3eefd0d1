use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored file. Written once at ingestion and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upload {
    pub id: Uuid,
    /// Generated name the bytes are stored under
    pub stored_name: String,
    /// Name supplied by the client
    pub original_name: String,
    /// Locator the blob store can resolve, usually the stored name
    pub file_path: String,
    pub size: i64,
    pub mime_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Upload {
    /// Last path segment of the locator, whichever separator it was written with.
    pub fn file_basename(&self) -> &str {
        self.file_path
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or(&self.file_path)
    }
}

#[derive(Debug, Clone)]
pub struct NewUpload {
    pub stored_name: String,
    pub original_name: String,
    pub file_path: String,
    pub size: i64,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: Uuid,
    pub filename: String,
    pub original_filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Upload> for UploadResponse {
    fn from(upload: Upload) -> Self {
        UploadResponse {
            id: upload.id,
            filename: upload.stored_name,
            original_filename: upload.original_name,
            file_path: upload.file_path,
            file_size: upload.size,
            file_type: upload.mime_type,
            uploaded_at: upload.uploaded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload_at(path: &str) -> Upload {
        Upload {
            id: Uuid::new_v4(),
            stored_name: "file-1-2.png".to_string(),
            original_name: "hull.png".to_string(),
            file_path: path.to_string(),
            size: 10,
            mime_type: "image/png".to_string(),
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_file_basename() {
        assert_eq!(upload_at("file-1-2.png").file_basename(), "file-1-2.png");
        assert_eq!(upload_at("/srv/uploads/file-1-2.png").file_basename(), "file-1-2.png");
        assert_eq!(upload_at("C:\\uploads\\file-1-2.png").file_basename(), "file-1-2.png");
    }

    #[test]
    fn test_upload_response_field_names() {
        let json = serde_json::to_value(UploadResponse::from(upload_at("file-1-2.png"))).unwrap();
        assert_eq!(json["filename"], "file-1-2.png");
        assert_eq!(json["originalFilename"], "hull.png");
        assert_eq!(json["fileSize"], 10);
        assert_eq!(json["fileType"], "image/png");
        assert!(json.get("uploadedAt").is_some());
    }
}
