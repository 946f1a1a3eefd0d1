use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::parse_id;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use harbor_core::models::{CreateRequirementRequest, RequirementResponse};
use harbor_core::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct RequirementListResponse {
    pub success: bool,
    pub requirements: Vec<RequirementResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequirementItemResponse {
    pub success: bool,
    pub requirement: RequirementResponse,
}

#[utoipa::path(
    get,
    path = "/api/requirements",
    tag = "requirements",
    responses(
        (status = 200, description = "All requirements, oldest first", body = RequirementListResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_requirements"))]
pub async fn list_requirements(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let requirements = state.requirements.list_requirements().await?;

    Ok(Json(RequirementListResponse {
        success: true,
        requirements: requirements.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/requirements/{id}",
    tag = "requirements",
    params(
        ("id" = String, Path, description = "Requirement ID")
    ),
    responses(
        (status = 200, description = "Requirement", body = RequirementItemResponse),
        (status = 400, description = "Invalid requirement ID", body = ErrorResponse),
        (status = 404, description = "Requirement not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(requirement_id = %id, operation = "get_requirement"))]
pub async fn get_requirement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_id(&id, "Invalid requirement ID")?;
    let requirement = state
        .requirements
        .get_requirement(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Requirement not found".to_string()))?;

    Ok(Json(RequirementItemResponse {
        success: true,
        requirement: requirement.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/requirements",
    tag = "requirements",
    request_body = CreateRequirementRequest,
    responses(
        (status = 200, description = "Requirement created", body = RequirementItemResponse),
        (status = 400, description = "Description is required", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "create_requirement"))]
pub async fn create_requirement(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateRequirementRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Whitespace-only descriptions count as missing.
    let description = request.description.trim().to_string();
    CreateRequirementRequest {
        description: description.clone(),
    }
    .validate()
    .map_err(|_| AppError::InvalidInput("Description is required".to_string()))?;

    let requirement = state.requirements.create_requirement(&description).await?;
    tracing::info!(requirement_id = %requirement.id, "Requirement created");

    Ok((
        StatusCode::OK,
        Json(RequirementItemResponse {
            success: true,
            requirement: requirement.into(),
        }),
    ))
}
