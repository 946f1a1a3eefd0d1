//! Harbor Storage Library
//!
//! Blob storage for uploaded files. Files are written once under a generated
//! name and later looked up by the locator recorded alongside the upload.
//!
//! # Locators
//!
//! New uploads record the bare stored name. Older records may hold an absolute
//! path or a path relative to a previous upload directory, so reads try a fixed
//! list of candidates (see [`LocalBlobStore::candidates`]) and use the first
//! file that exists.

pub mod local;
pub mod names;
pub mod traits;

// Re-export commonly used types
pub use local::LocalBlobStore;
pub use traits::{BlobStore, BlobStream, StorageError, StorageResult, StoredBlob};
