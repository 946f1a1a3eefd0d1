//! Harbor Core Library
//!
//! Domain models, error types, configuration and the compliance rule shared by
//! every Harbor component.

pub mod compliance;
pub mod config;
pub mod error;
pub mod mime;
pub mod models;

// Re-export commonly used types
pub use compliance::{Assessment, ComplianceRule, FilenamePatternRule};
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use mime::ContentKind;
// Note: BlobStore and StorageError live in harbor-storage
