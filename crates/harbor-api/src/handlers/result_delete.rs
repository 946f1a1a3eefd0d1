use crate::error::{ErrorResponse, HttpAppError};
use crate::services::deletion::DeletionService;
use crate::state::AppState;
use crate::utils::parse_id;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[utoipa::path(
    delete,
    path = "/api/results/{id}",
    tag = "results",
    params(
        ("id" = String, Path, description = "Result ID")
    ),
    responses(
        (status = 200, description = "Result, upload and file deleted", body = MessageResponse),
        (status = 400, description = "Invalid result ID", body = ErrorResponse),
        (status = 404, description = "Result not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(result_id = %id, operation = "delete_result"))]
pub async fn delete_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_id(&id, "Invalid result ID")?;
    DeletionService::new(&state).delete(id).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Result deleted successfully".to_string(),
    }))
}
