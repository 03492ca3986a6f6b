//! Core persistence logic for employee review records.
//! This crate is the single source of truth for review invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::employee::{Employee, EmployeeId, EmployeeValidationError};
pub use model::review::{Review, ReviewId, ReviewValidationError, MIN_REVIEW_YEAR};
pub use repo::employee_repo::{EmployeeLookup, EmployeeRepository, SqliteEmployeeRepository};
pub use repo::identity_map::IdentityMap;
pub use repo::review_repo::{ReviewRepository, SqliteReviewRepository};
pub use repo::{RepoError, RepoResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
