use crate::error::{ErrorResponse, HttpAppError};
use crate::services::ingestion::IngestionService;
use crate::state::AppState;
use crate::utils::upload::{extract_upload, NO_FILE_MESSAGE};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use harbor_core::models::{ResultResponse, UploadResponse};
use harbor_core::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadCreatedResponse {
    pub success: bool,
    pub message: String,
    pub upload: UploadResponse,
    pub result: ResultResponse,
}

#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded successfully", body = UploadCreatedResponse),
        (status = 400, description = "No file, disallowed type or file too large", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    // A body that is not multipart/form-data carries no file.
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Upload body is not multipart");
        AppError::InvalidInput(NO_FILE_MESSAGE.to_string())
    })?;

    let file = extract_upload(
        multipart,
        state.config.max_upload_size_bytes(),
        state.config.max_upload_size_mb,
    )
    .await?;

    let ingested = IngestionService::new(&state).ingest(file).await?;

    Ok((
        StatusCode::OK,
        Json(UploadCreatedResponse {
            success: true,
            message: "File uploaded successfully".to_string(),
            upload: ingested.upload.into(),
            result: ingested.result.into(),
        }),
    ))
}
