//! Data models for the application
//!
//! Records persisted by the metadata store and the response shapes returned to
//! clients. Response field names follow what existing clients already read,
//! which is why some views are camelCase and others snake_case.

mod requirement;
mod result;
mod upload;

pub use requirement::*;
pub use result::*;
pub use upload::*;
