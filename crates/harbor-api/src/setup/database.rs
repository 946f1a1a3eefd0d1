//! Database setup and initialization

use anyhow::{Context, Result};
use harbor_core::Config;
use harbor_db::{is_connectivity_error, seed_default_requirements, RequirementStore, RetryError, RetryPolicy};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;

/// Retry budget shared by startup and per-request connection acquisition.
pub fn retry_policy(config: &Config) -> RetryPolicy {
    RetryPolicy::new(config.db_connect_attempts, config.db_connect_retry_delay())
}

fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
}

/// Connect with bounded retries and run migrations.
///
/// If the database stays unreachable the server still starts on a lazily
/// connecting pool, and requests answer 503 until it comes back. Errors that
/// retrying cannot fix (bad credentials, bad URL) abort startup.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    tracing::info!(
        attempts = config.db_connect_attempts,
        "Connecting to database..."
    );

    let options = pool_options(config);
    let connected = retry_policy(config)
        .run(
            "connect_database",
            || options.clone().connect(&config.database_url),
            is_connectivity_error,
        )
        .await;

    let pool = match connected {
        Ok(pool) => pool,
        Err(RetryError::Exhausted { attempts, source, .. }) => {
            tracing::warn!(
                attempts,
                error = %source,
                "Database unreachable, starting without it; migrations skipped until restart"
            );
            return options
                .connect_lazy(&config.database_url)
                .context("Failed to create lazy database pool");
        }
        Err(RetryError::Permanent(source)) => {
            return Err(source).context("Failed to connect to database");
        }
    };

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connected successfully"
    );

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Run pending migrations (path: workspace migrations/ from crate root)
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Seed the default requirements. Failure is logged, never fatal.
pub async fn seed_requirements(store: &dyn RequirementStore) {
    match seed_default_requirements(store).await {
        Ok(0) => {}
        Ok(count) => tracing::info!(count, "Default requirements inserted"),
        Err(e) => tracing::warn!(error = %e, "Could not seed default requirements"),
    }
}
