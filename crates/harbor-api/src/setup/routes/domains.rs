//! Domain route groups (uploads, results, requirements).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn upload_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/upload", API_PREFIX),
        post(handlers::upload::upload_file),
    )
}

pub fn result_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/results", API_PREFIX),
            get(handlers::result_get::list_results),
        )
        .route(
            &format!("{}/results/{{id}}", API_PREFIX),
            get(handlers::result_get::get_result).delete(handlers::result_delete::delete_result),
        )
        .route(
            &format!("{}/results/{{id}}/download", API_PREFIX),
            get(handlers::report_download::download_report),
        )
}

pub fn requirement_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/requirements", API_PREFIX),
            get(handlers::requirements::list_requirements)
                .post(handlers::requirements::create_requirement),
        )
        .route(
            &format!("{}/requirements/{{id}}", API_PREFIX),
            get(handlers::requirements::get_requirement),
        )
}
