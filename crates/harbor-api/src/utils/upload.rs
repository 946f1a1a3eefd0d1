//! Multipart extraction for the upload endpoint

use crate::constants::UPLOAD_FIELD;
use crate::services::ingestion::{invalid_type_message, too_large_message, IncomingFile};
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use harbor_core::{mime, AppError};

pub const NO_FILE_MESSAGE: &str = "No file uploaded";

/// Pull the single `file` field out of the form.
///
/// The declared content type is checked before the body is read, and the
/// body is read chunk by chunk so an oversized file is rejected as soon as
/// it crosses `max_bytes`.
pub async fn extract_upload(
    mut multipart: Multipart,
    max_bytes: usize,
    max_mb: usize,
) -> Result<IncomingFile, AppError> {
    let mut file: Option<IncomingFile> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_mb))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if file.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let original_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "unknown".to_string());
        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if !mime::is_allowed_upload_type(&mime_type) {
            tracing::debug!(mime_type = %mime_type, original_name = %original_name, "Rejected upload type");
            return Err(AppError::InvalidInput(invalid_type_message()));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, max_mb))?
        {
            if data.len() + chunk.len() > max_bytes {
                return Err(AppError::InvalidInput(too_large_message(max_mb)));
            }
            data.extend_from_slice(&chunk);
        }

        file = Some(IncomingFile {
            original_name,
            mime_type,
            data,
        });
    }

    file.ok_or_else(|| AppError::InvalidInput(NO_FILE_MESSAGE.to_string()))
}

fn multipart_error(err: MultipartError, max_mb: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::InvalidInput(too_large_message(max_mb))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}
