use super::{acquire, RequirementStore};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use harbor_core::models::{Requirement, DEFAULT_REQUIREMENTS};
use harbor_core::AppError;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

#[derive(FromRow)]
struct RequirementRow {
    id: Uuid,
    description: String,
    created_at: DateTime<Utc>,
}

impl From<RequirementRow> for Requirement {
    fn from(row: RequirementRow) -> Self {
        Requirement {
            id: row.id,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// Postgres-backed [`RequirementStore`]
#[derive(Clone)]
pub struct PgRequirementStore {
    pool: PgPool,
    retry: RetryPolicy,
}

impl PgRequirementStore {
    pub fn new(pool: PgPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }
}

#[async_trait]
impl RequirementStore for PgRequirementStore {
    #[tracing::instrument(skip(self), fields(db.table = "requirements", db.operation = "select"))]
    async fn list_requirements(&self) -> Result<Vec<Requirement>, AppError> {
        let mut conn = acquire(&self.pool, &self.retry).await?;

        let rows = sqlx::query_as::<Postgres, RequirementRow>(
            "SELECT id, description, created_at FROM requirements ORDER BY created_at ASC",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "requirements", db.operation = "select", db.record_id = %id))]
    async fn get_requirement(&self, id: Uuid) -> Result<Option<Requirement>, AppError> {
        let mut conn = acquire(&self.pool, &self.retry).await?;

        let row = sqlx::query_as::<Postgres, RequirementRow>(
            "SELECT id, description, created_at FROM requirements WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip(self, description), fields(db.table = "requirements", db.operation = "insert"))]
    async fn create_requirement(&self, description: &str) -> Result<Requirement, AppError> {
        let mut conn = acquire(&self.pool, &self.retry).await?;

        // clock_timestamp() keeps back-to-back inserts in insertion order
        let row = sqlx::query_as::<Postgres, RequirementRow>(
            r#"
            INSERT INTO requirements (id, description, created_at)
            VALUES ($1, $2, clock_timestamp())
            RETURNING id, description, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(description)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row.into())
    }

    async fn count_requirements(&self) -> Result<i64, AppError> {
        let mut conn = acquire(&self.pool, &self.retry).await?;

        let count = sqlx::query_scalar::<Postgres, i64>("SELECT COUNT(*) FROM requirements")
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }
}

/// Insert the default requirement list if the store has none yet.
///
/// Returns how many requirements were inserted.
pub async fn seed_default_requirements(store: &dyn RequirementStore) -> Result<usize, AppError> {
    if store.count_requirements().await? > 0 {
        tracing::debug!("Requirements already present, skipping seed");
        return Ok(0);
    }

    for description in DEFAULT_REQUIREMENTS {
        store.create_requirement(description).await?;
    }

    tracing::info!(count = DEFAULT_REQUIREMENTS.len(), "Seeded default requirements");
    Ok(DEFAULT_REQUIREMENTS.len())
}
