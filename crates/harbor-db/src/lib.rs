//! Harbor metadata store
//!
//! Persistence for uploads, their compliance results and the requirement
//! reference list. Callers depend on the [`ResultStore`] and
//! [`RequirementStore`] traits; the Postgres repositories are the production
//! implementation and [`memory::InMemoryStore`] backs tests.

pub mod db;
#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;
pub mod retry;

pub use db::{
    is_connectivity_error, seed_default_requirements, PgRequirementStore, PgResultStore,
    RequirementStore, ResultStore,
};
pub use retry::{RetryError, RetryPolicy};
