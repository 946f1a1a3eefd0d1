//! Route configuration and setup.
//!
//! Domain route groups live in [domains](domains); health checks in [health](health).

mod domains;
mod health;

use crate::api_doc::ApiDoc;
use crate::constants::{API_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
    Json, Router,
};
use harbor_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // The multipart reader enforces the exact file cap; this only stops runaway bodies.
    let body_limit = config.max_upload_size_bytes() + MULTIPART_OVERHEAD_BYTES;
    tracing::info!(body_limit_bytes = body_limit, "Request body limit set");

    let app = Router::new()
        .merge(health_routes())
        .merge(domains::upload_routes())
        .merge(domains::result_routes())
        .merge(domains::requirement_routes())
        .route(
            &format!("{}/openapi.json", API_PREFIX),
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(RapiDoc::new("/api/openapi.json").path("/docs"))
        .nest_service(
            &config.public_uploads_path,
            ServeDir::new(&config.upload_dir),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/health", API_PREFIX), get(health::health_check))
        .route(
            &format!("{}/health/ready", API_PREFIX),
            get(health::readiness_check),
        )
}
