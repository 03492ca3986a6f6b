//! Repository layer: data access contracts and SQLite implementations.
//!
//! # Responsibility
//! - Translate between model values and table rows.
//! - Report semantic failures (`NotFound`, `NotPersisted`) alongside
//!   transport errors.
//!
//! # Invariants
//! - Write paths that validate do so before any SQL mutation.
//! - Each write is one auto-committed statement.

use crate::db::DbError;
use crate::model::employee::EmployeeValidationError;
use crate::model::review::ReviewValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod employee_repo;
pub mod identity_map;
pub mod review_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    InvalidReview(ReviewValidationError),
    InvalidEmployee(EmployeeValidationError),
    Db(DbError),
    /// No row (or cached value) exists for the given id.
    NotFound(i64),
    /// The operation requires a row id but the value has none.
    NotPersisted,
    /// `save` was called on a value that already has a row id.
    AlreadyPersisted(i64),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReview(err) => write!(f, "{err}"),
            Self::InvalidEmployee(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "row not found: {id}"),
            Self::NotPersisted => write!(f, "value has not been saved yet"),
            Self::AlreadyPersisted(id) => write!(f, "value is already saved with id {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidReview(err) => Some(err),
            Self::InvalidEmployee(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::NotPersisted
            | Self::AlreadyPersisted(_)
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<ReviewValidationError> for RepoError {
    fn from(value: ReviewValidationError) -> Self {
        Self::InvalidReview(value)
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::InvalidEmployee(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
