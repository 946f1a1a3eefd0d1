//! Harbor API Library
//!
//! HTTP surface of Harbor: upload ingestion, compliance results, PDF reports
//! and reference requirements.

mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
mod telemetry;
mod utils;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
