//! Error types module
//!
//! All failures surfaced by Harbor are unified under [`AppError`]. Each variant
//! describes its own HTTP presentation through [`ErrorMetadata`], so the transport
//! layer only has to render what the error says about itself.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Severity at which a failure is logged by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Caller mistakes: bad ids, rejected uploads, unknown records
    Debug,
    /// The store is down; nothing is wrong with the request
    Warn,
    Error,
}

/// How a failure presents itself over HTTP.
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Stable code clients can branch on, e.g. `STORE_UNAVAILABLE`.
    fn error_code(&self) -> &'static str;

    /// Whether the same request may succeed later.
    fn is_recoverable(&self) -> bool;

    /// Remediation hint shown next to the message.
    fn suggested_action(&self) -> Option<&'static str>;

    /// Message shown to clients. Never carries internal detail for
    /// sensitive errors.
    fn client_message(&self) -> String;

    /// Sensitive errors never expose their cause in a response.
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    /// The metadata store could not be reached, even after retrying.
    #[error("Database unavailable: {0}")]
    StoreUnavailable(String),

    /// Blob storage failed to write, read or delete a file.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error: {message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::PoolTimedOut
            | SqlxError::PoolClosed
            | SqlxError::Io(_)
            | SqlxError::Tls(_)
            | SqlxError::WorkerCrashed => AppError::StoreUnavailable(err.to_string()),
            other => AppError::Database(other),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("Malformed id: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

const RETRY_LATER: &str = "Retry after a short delay";

/// Fixed presentation of one variant.
#[derive(Debug, Clone, Copy)]
struct Presentation {
    status: u16,
    code: &'static str,
    recoverable: bool,
    hint: Option<&'static str>,
    sensitive: bool,
    level: LogLevel,
}

impl AppError {
    /// True when the error means "the store is unreachable" rather than "the query failed".
    pub fn is_connectivity(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }

    fn presentation(&self) -> Presentation {
        match self {
            AppError::Database(_) => Presentation {
                status: 500,
                code: "DATABASE_ERROR",
                recoverable: true,
                hint: Some(RETRY_LATER),
                sensitive: true,
                level: LogLevel::Error,
            },
            AppError::StoreUnavailable(_) => Presentation {
                status: 503,
                code: "STORE_UNAVAILABLE",
                recoverable: true,
                hint: Some("Check that the database is running and reachable, then retry"),
                sensitive: false,
                level: LogLevel::Warn,
            },
            AppError::Storage(_) => Presentation {
                status: 500,
                code: "STORAGE_ERROR",
                recoverable: true,
                hint: Some(RETRY_LATER),
                sensitive: true,
                level: LogLevel::Error,
            },
            AppError::InvalidInput(_) => Presentation {
                status: 400,
                code: "INVALID_INPUT",
                recoverable: false,
                hint: Some("Fix the request and send it again"),
                sensitive: false,
                level: LogLevel::Debug,
            },
            AppError::NotFound(_) => Presentation {
                status: 404,
                code: "NOT_FOUND",
                recoverable: false,
                hint: Some("Refresh the result list; the record may have been deleted"),
                sensitive: false,
                level: LogLevel::Debug,
            },
            AppError::Internal(_) | AppError::InternalWithSource { .. } => Presentation {
                status: 500,
                code: "INTERNAL_ERROR",
                recoverable: true,
                hint: Some(RETRY_LATER),
                sensitive: true,
                level: LogLevel::Error,
            },
        }
    }

    /// Variant name, included in non-production error bodies.
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::StoreUnavailable(_) => "StoreUnavailable",
            AppError::Storage(_) => "Storage",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// The error followed by up to five of its causes, one per line.
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();
        let mut causes = std::iter::successors(self.source(), |err| (*err).source());
        for cause in causes.by_ref().take(5) {
            details.push_str(&format!("\n  Caused by: {}", cause));
        }
        if causes.next().is_some() {
            details.push_str("\n  ... (truncated)");
        }
        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.presentation().status
    }

    fn error_code(&self) -> &'static str {
        self.presentation().code
    }

    fn is_recoverable(&self) -> bool {
        self.presentation().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.presentation().hint
    }

    fn is_sensitive(&self) -> bool {
        self.presentation().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.presentation().level
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::StoreUnavailable(_) => {
                "Database connection failed. Please check your database connection and try again."
                    .to_string()
            }
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage(_) => "Failed to access file storage".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_database() {
        #[cfg(feature = "sqlx")]
        let err = AppError::from(sqlx::Error::RowNotFound);
        #[cfg(not(feature = "sqlx"))]
        let err = AppError::Database("row not found".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Failed to access database");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_connectivity_failures_become_store_unavailable() {
        for err in [sqlx::Error::PoolTimedOut, sqlx::Error::PoolClosed] {
            let app = AppError::from(err);
            assert!(app.is_connectivity());
            assert_eq!(app.http_status_code(), 503);
            assert_eq!(app.error_code(), "STORE_UNAVAILABLE");
            assert!(app.suggested_action().is_some());
            assert_eq!(app.log_level(), LogLevel::Warn);
        }

        let io = sqlx::Error::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(AppError::from(io).is_connectivity());
    }

    #[test]
    fn test_error_metadata_not_found() {
        let err = AppError::NotFound("Result not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Result not found");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_invalid_input_is_bad_request() {
        let err = AppError::from(uuid::Uuid::parse_str("nope").unwrap_err());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_detailed_message_lists_causes() {
        let err = AppError::from(
            anyhow::anyhow!("permission denied")
                .context("open uploads/file-1-2.txt")
                .context("read blob"),
        );
        let details = err.detailed_message();
        assert!(details.starts_with("Internal error: read blob"));
        assert!(details.contains("Caused by: open uploads/file-1-2.txt"));
        assert!(details.contains("Caused by: permission denied"));
        assert!(!details.contains("truncated"));
    }

    #[test]
    fn test_internal_hides_details() {
        let err = AppError::from(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.is_sensitive());
        assert!(err.detailed_message().contains("disk on fire"));
    }
}
