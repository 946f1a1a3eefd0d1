//! Health check handlers and response types.

use crate::constants::HEALTH_CHECK_TIMEOUT_SECS;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Run an async check with timeout; returns status string "ready", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "ready".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(Serialize)]
pub(super) struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Serialize)]
pub(super) struct ReadinessResponse {
    pub status: &'static str,
    pub database: String,
}

/// Liveness: the process is up.
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        message: "Server is running",
    })
}

/// Readiness: the metadata store answers.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let results = state.results.clone();
    let database = run_check(
        Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS),
        async move { results.ping().await },
        "not_ready",
    )
    .await;

    if database == "ready" {
        (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                database,
            }),
        )
    } else {
        tracing::warn!(database = %database, "Readiness check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not_ready",
                database,
            }),
        )
    }
}
