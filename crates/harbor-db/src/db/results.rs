use super::{acquire, ResultStore};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use harbor_core::models::{
    ComplianceResult, NewComplianceResult, NewUpload, ResultWithUpload, Upload,
};
use harbor_core::AppError;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

const RESULT_WITH_UPLOAD_SELECT: &str = r#"
    SELECT r.id, r.upload_id, r.configured, r.issues_detected, r.report_path,
           r.created_at, r.updated_at,
           u.id AS u_id, u.stored_name AS u_stored_name, u.original_name AS u_original_name,
           u.file_path AS u_file_path, u.file_size AS u_file_size,
           u.mime_type AS u_mime_type, u.uploaded_at AS u_uploaded_at
    FROM results r
    LEFT JOIN uploads u ON u.id = r.upload_id
"#;

#[derive(FromRow)]
struct UploadRow {
    id: Uuid,
    stored_name: String,
    original_name: String,
    file_path: String,
    file_size: i64,
    mime_type: String,
    uploaded_at: DateTime<Utc>,
}

impl From<UploadRow> for Upload {
    fn from(row: UploadRow) -> Self {
        Upload {
            id: row.id,
            stored_name: row.stored_name,
            original_name: row.original_name,
            file_path: row.file_path,
            size: row.file_size,
            mime_type: row.mime_type,
            uploaded_at: row.uploaded_at,
        }
    }
}

#[derive(FromRow)]
struct ResultRow {
    id: Uuid,
    upload_id: Option<Uuid>,
    configured: bool,
    issues_detected: i32,
    report_path: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ResultRow> for ComplianceResult {
    fn from(row: ResultRow) -> Self {
        ComplianceResult {
            id: row.id,
            upload_id: row.upload_id,
            configured: row.configured,
            issues_detected: row.issues_detected,
            report_path: row.report_path,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Result joined with the nullable side of the upload table.
#[derive(FromRow)]
struct ResultUploadRow {
    #[sqlx(flatten)]
    result: ResultRow,
    u_id: Option<Uuid>,
    u_stored_name: Option<String>,
    u_original_name: Option<String>,
    u_file_path: Option<String>,
    u_file_size: Option<i64>,
    u_mime_type: Option<String>,
    u_uploaded_at: Option<DateTime<Utc>>,
}

impl From<ResultUploadRow> for ResultWithUpload {
    fn from(row: ResultUploadRow) -> Self {
        let upload = match (
            row.u_id,
            row.u_stored_name,
            row.u_original_name,
            row.u_file_path,
            row.u_file_size,
            row.u_mime_type,
            row.u_uploaded_at,
        ) {
            (
                Some(id),
                Some(stored_name),
                Some(original_name),
                Some(file_path),
                Some(size),
                Some(mime_type),
                Some(uploaded_at),
            ) => Some(Upload {
                id,
                stored_name,
                original_name,
                file_path,
                size,
                mime_type,
                uploaded_at,
            }),
            _ => None,
        };

        ResultWithUpload {
            result: row.result.into(),
            upload,
        }
    }
}

/// Postgres-backed [`ResultStore`]
#[derive(Clone)]
pub struct PgResultStore {
    pool: PgPool,
    retry: RetryPolicy,
}

impl PgResultStore {
    pub fn new(pool: PgPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }
}

#[async_trait]
impl ResultStore for PgResultStore {
    #[tracing::instrument(skip(self, upload), fields(db.table = "uploads", db.operation = "insert"))]
    async fn create_upload(&self, upload: NewUpload) -> Result<Upload, AppError> {
        let mut conn = acquire(&self.pool, &self.retry).await?;

        let row = sqlx::query_as::<Postgres, UploadRow>(
            r#"
            INSERT INTO uploads (id, stored_name, original_name, file_path, file_size, mime_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, stored_name, original_name, file_path, file_size, mime_type, uploaded_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&upload.stored_name)
        .bind(&upload.original_name)
        .bind(&upload.file_path)
        .bind(upload.size)
        .bind(&upload.mime_type)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self, result), fields(db.table = "results", db.operation = "insert", upload_id = %result.upload_id))]
    async fn create_result(
        &self,
        result: NewComplianceResult,
    ) -> Result<ComplianceResult, AppError> {
        let mut conn = acquire(&self.pool, &self.retry).await?;

        let row = sqlx::query_as::<Postgres, ResultRow>(
            r#"
            INSERT INTO results (id, upload_id, issues_detected)
            VALUES ($1, $2, $3)
            RETURNING id, upload_id, configured, issues_detected, report_path, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(result.upload_id)
        .bind(result.issues_detected)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "results", db.operation = "select"))]
    async fn list_results(&self) -> Result<Vec<ResultWithUpload>, AppError> {
        let mut conn = acquire(&self.pool, &self.retry).await?;

        let sql = format!("{} ORDER BY r.created_at DESC", RESULT_WITH_UPLOAD_SELECT);
        let rows = sqlx::query_as::<Postgres, ResultUploadRow>(&sql)
            .fetch_all(&mut *conn)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "results", db.operation = "select", db.record_id = %id))]
    async fn get_result(&self, id: Uuid) -> Result<Option<ResultWithUpload>, AppError> {
        let mut conn = acquire(&self.pool, &self.retry).await?;

        let sql = format!("{} WHERE r.id = $1", RESULT_WITH_UPLOAD_SELECT);
        let row = sqlx::query_as::<Postgres, ResultUploadRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip(self), fields(db.table = "uploads", db.operation = "delete", db.record_id = %id))]
    async fn delete_upload(&self, id: Uuid) -> Result<bool, AppError> {
        let mut conn = acquire(&self.pool, &self.retry).await?;

        let result = sqlx::query("DELETE FROM uploads WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "results", db.operation = "delete", db.record_id = %id))]
    async fn delete_result(&self, id: Uuid) -> Result<bool, AppError> {
        let mut conn = acquire(&self.pool, &self.retry).await?;

        let result = sqlx::query("DELETE FROM results WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        let mut conn = acquire(&self.pool, &self.retry).await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}
