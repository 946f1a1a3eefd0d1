use crate::error::{ErrorResponse, HttpAppError};
use crate::services::report::ReportService;
use crate::state::AppState;
use crate::utils::{attachment_disposition, parse_id};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use harbor_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/results/{id}/download",
    tag = "results",
    params(
        ("id" = String, Path, description = "Result ID")
    ),
    responses(
        (status = 200, description = "PDF report", content_type = "application/pdf"),
        (status = 400, description = "Invalid result ID", body = ErrorResponse),
        (status = 404, description = "Result or stored file not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(result_id = %id, operation = "download_report"))]
pub async fn download_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_id(&id, "Invalid result ID")?;
    let report = ReportService::new(&state).generate(id).await?;

    tracing::debug!(
        filename = %report.filename,
        passthrough = report.passthrough,
        "Streaming report"
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&report.filename),
        )
        .body(Body::from_stream(report.body))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
