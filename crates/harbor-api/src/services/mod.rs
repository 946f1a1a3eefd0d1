//! Business operations behind the HTTP handlers.

pub mod deletion;
pub mod ingestion;
pub mod report;
pub mod results;
