//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use harbor_core::{Config, FilenamePatternRule};
use harbor_db::{PgRequirementStore, PgResultStore};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config.environment, config.is_production());
    crate::error::set_production_mode(config.is_production());
    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let retry = database::retry_policy(&config);
    let results = Arc::new(PgResultStore::new(pool.clone(), retry));
    let requirements = Arc::new(PgRequirementStore::new(pool, retry));

    database::seed_requirements(requirements.as_ref()).await;

    let blobs = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(
        config.clone(),
        results,
        requirements,
        blobs,
        Arc::new(FilenamePatternRule),
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
