//! Database repositories for the data access layer
//!
//! The traits here are what the rest of the application depends on. Every
//! Postgres call first acquires a pooled connection through the shared
//! [`RetryPolicy`], so an unreachable database is retried a bounded number of
//! times and then surfaces as [`AppError::StoreUnavailable`].

mod requirements;
mod results;

pub use requirements::{seed_default_requirements, PgRequirementStore};
pub use results::PgResultStore;

use crate::retry::{RetryError, RetryPolicy};
use async_trait::async_trait;
use harbor_core::models::{
    ComplianceResult, NewComplianceResult, NewUpload, Requirement, ResultWithUpload, Upload,
};
use harbor_core::AppError;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Uploads and the results derived from them.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn create_upload(&self, upload: NewUpload) -> Result<Upload, AppError>;

    async fn create_result(&self, result: NewComplianceResult)
        -> Result<ComplianceResult, AppError>;

    /// Every result with its upload, newest result first.
    async fn list_results(&self) -> Result<Vec<ResultWithUpload>, AppError>;

    async fn get_result(&self, id: Uuid) -> Result<Option<ResultWithUpload>, AppError>;

    /// Returns `false` when no such upload existed.
    async fn delete_upload(&self, id: Uuid) -> Result<bool, AppError>;

    /// Returns `false` when no such result existed.
    async fn delete_result(&self, id: Uuid) -> Result<bool, AppError>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Requirement reference data.
#[async_trait]
pub trait RequirementStore: Send + Sync {
    /// All requirements, oldest first.
    async fn list_requirements(&self) -> Result<Vec<Requirement>, AppError>;

    async fn get_requirement(&self, id: Uuid) -> Result<Option<Requirement>, AppError>;

    async fn create_requirement(&self, description: &str) -> Result<Requirement, AppError>;

    async fn count_requirements(&self) -> Result<i64, AppError>;
}

/// Errors that mean "could not talk to the database" rather than "the query was wrong".
pub fn is_connectivity_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed
    )
}

pub(crate) fn retry_error_to_app(err: RetryError<sqlx::Error>) -> AppError {
    match err {
        RetryError::Exhausted {
            attempts, source, ..
        } => AppError::StoreUnavailable(format!("{} (after {} attempts)", source, attempts)),
        RetryError::Permanent(source) => AppError::from(source),
    }
}

pub(crate) async fn acquire(
    pool: &PgPool,
    retry: &RetryPolicy,
) -> Result<PoolConnection<Postgres>, AppError> {
    retry
        .run("acquire_connection", || pool.acquire(), is_connectivity_error)
        .await
        .map_err(retry_error_to_app)
}
