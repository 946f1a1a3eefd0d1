//! Rendering of `AppError` as JSON error responses.
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that
//! converts into `AppError` converts into `HttpAppError`, so `?` renders every
//! failure with the same status mapping, body shape and logging.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use harbor_core::{AppError, ErrorMetadata, LogLevel};
use harbor_storage::StorageError;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::OnceLock;
use utoipa::ToSchema;

/// Set once from `Config` during setup; unset means development.
static PRODUCTION: OnceLock<bool> = OnceLock::new();

/// Shown when a recorded upload no longer resolves to a file.
pub const FILE_NOT_FOUND_MESSAGE: &str =
    "File not found. The uploaded file may have been removed or the path is incorrect.";

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    pub message: String,
    /// Underlying cause; omitted in production and for sensitive errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Stable code, e.g. `NOT_FOUND`
    pub code: String,
    /// Whether retrying the same request may succeed
    pub recoverable: bool,
    /// Suggested action for the client (e.g., "Check that the database is running")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// `AppError` as an axum response. `AppError` lives in harbor-core, which
/// knows nothing about axum.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(storage_error(err))
    }
}

/// Malformed or mistyped JSON bodies are the caller's fault: 400.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// Map a blob store failure onto the application taxonomy.
pub fn storage_error(err: StorageError) -> AppError {
    match err {
        StorageError::NotFound(_) | StorageError::InvalidLocator(_) => {
            AppError::NotFound(FILE_NOT_FOUND_MESSAGE.to_string())
        }
        StorageError::WriteFailed(msg)
        | StorageError::ReadFailed(msg)
        | StorageError::DeleteFailed(msg) => AppError::Storage(msg),
        StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
        StorageError::ConfigError(msg) => AppError::Internal(msg),
    }
}

/// `Json` extractor whose rejection uses the regular error body.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => tracing::debug!(error = %error, code, "Request rejected"),
        LogLevel::Warn => tracing::warn!(error = %error, code, "Request failed"),
        LogLevel::Error => {
            tracing::error!(error = %error.detailed_message(), code, "Request failed")
        }
    }
}

/// Record whether error bodies should omit details. Only the first call wins.
pub fn set_production_mode(production: bool) {
    if PRODUCTION.set(production).is_err() {
        tracing::debug!("Production mode already set, keeping the first value");
    }
}

fn production_mode() -> bool {
    PRODUCTION.get().copied().unwrap_or(false)
}

fn error_body(error: &AppError, production: bool) -> ErrorResponse {
    // Always hide details in production; elsewhere only for sensitive errors.
    let hide_details = production || error.is_sensitive();
    ErrorResponse {
        success: false,
        message: error.client_message(),
        error: (!hide_details).then(|| error.detailed_message()),
        error_type: (!hide_details).then(|| error.error_type().to_string()),
        code: error.error_code().to_string(),
        recoverable: error.is_recoverable(),
        suggested_action: error.suggested_action().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = error_body(app_error, production_mode());
        (status, Json(body)).into_response()
    }
}
