use crate::error::{ErrorResponse, HttpAppError};
use crate::services::results::ResultQueryService;
use crate::state::AppState;
use crate::utils::parse_id;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use harbor_core::models::{ResultDetail, ResultView};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ResultListResponse {
    pub success: bool,
    pub results: Vec<ResultView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResultDetailResponse {
    pub success: bool,
    pub result: ResultDetail,
}

#[utoipa::path(
    get,
    path = "/api/results",
    tag = "results",
    responses(
        (status = 200, description = "All results, newest first", body = ResultListResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_results"))]
pub async fn list_results(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let results = ResultQueryService::new(&state).list().await?;
    tracing::debug!(count = results.len(), "Listed results");

    Ok(Json(ResultListResponse {
        success: true,
        results,
    }))
}

#[utoipa::path(
    get,
    path = "/api/results/{id}",
    tag = "results",
    params(
        ("id" = String, Path, description = "Result ID")
    ),
    responses(
        (status = 200, description = "Result details", body = ResultDetailResponse),
        (status = 400, description = "Invalid result ID", body = ErrorResponse),
        (status = 404, description = "Result not found", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(result_id = %id, operation = "get_result"))]
pub async fn get_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_id(&id, "Invalid result ID")?;
    let result = ResultQueryService::new(&state).get(id).await?;

    Ok(Json(ResultDetailResponse {
        success: true,
        result,
    }))
}
