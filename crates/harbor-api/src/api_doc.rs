//! OpenAPI documentation, served at `/api/openapi.json` and browsable at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use harbor_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Harbor API",
        version = "0.1.0",
        description = "Vessel document uploads, compliance results and PDF reports."
    ),
    paths(
        // Uploads
        handlers::upload::upload_file,
        // Results
        handlers::result_get::list_results,
        handlers::result_get::get_result,
        handlers::report_download::download_report,
        handlers::result_delete::delete_result,
        // Requirements
        handlers::requirements::list_requirements,
        handlers::requirements::get_requirement,
        handlers::requirements::create_requirement,
    ),
    components(
        schemas(
            models::UploadResponse,
            models::ResultResponse,
            models::ResultView,
            models::ResultDetail,
            models::RequirementResponse,
            models::CreateRequirementRequest,
            handlers::upload::UploadCreatedResponse,
            handlers::result_get::ResultListResponse,
            handlers::result_get::ResultDetailResponse,
            handlers::result_delete::MessageResponse,
            handlers::requirements::RequirementListResponse,
            handlers::requirements::RequirementItemResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "uploads", description = "File upload and ingestion"),
        (name = "results", description = "Compliance results, reports and deletion"),
        (name = "requirements", description = "Reference requirement list")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/upload",
            "/api/results",
            "/api/results/{id}",
            "/api/results/{id}/download",
            "/api/requirements",
            "/api/requirements/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
