//! Review domain model.
//!
//! # Responsibility
//! - Define the in-memory shape of one `reviews` row.
//! - Provide field-level validation that does not need storage access.
//!
//! # Invariants
//! - `id` is `None` until the review has been saved, and `Some` afterwards.
//! - `year` is never earlier than [`MIN_REVIEW_YEAR`] for validated values.
//! - `summary` is never empty for validated values.
//!
//! Whether `employee_id` points at an existing employee can only be checked
//! against storage; see `repo::review_repo`.

use crate::model::employee::EmployeeId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// SQLite rowid of a persisted review.
pub type ReviewId = i64;

/// Earliest year a review may be filed for.
pub const MIN_REVIEW_YEAR: i32 = 2000;

/// Validation failures for review fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewValidationError {
    /// `year` is earlier than the accepted minimum.
    YearTooEarly { year: i32, minimum: i32 },
    /// `summary` is empty.
    EmptySummary,
    /// `employee_id` does not reference an existing employee row.
    UnknownEmployee(EmployeeId),
}

impl Display for ReviewValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YearTooEarly { year, minimum } => {
                write!(f, "year must be >= {minimum}, got {year}")
            }
            Self::EmptySummary => write!(f, "summary must be a non-empty string"),
            Self::UnknownEmployee(id) => write!(f, "employee id {id} does not exist"),
        }
    }
}

impl Error for ReviewValidationError {}

/// One performance review filed against an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReviewWire")]
pub struct Review {
    /// Primary key; `None` while unpersisted.
    pub id: Option<ReviewId>,
    pub year: i32,
    pub summary: String,
    /// Must reference `employees.id`.
    pub employee_id: EmployeeId,
}

impl Review {
    /// Creates an unpersisted review.
    ///
    /// Does not validate; call [`Review::validate`] or go through
    /// `ReviewRepository::create`.
    pub fn new(year: i32, summary: impl Into<String>, employee_id: EmployeeId) -> Self {
        Self {
            id: None,
            year,
            summary: summary.into(),
            employee_id,
        }
    }

    /// Returns whether this review has been assigned a row id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Checks the fields that can be validated without storage access.
    pub fn validate(&self) -> Result<(), ReviewValidationError> {
        validate_year(self.year)?;
        validate_summary(&self.summary)
    }
}

impl Display for Review {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Review {id}: ")?,
            None => write!(f, "<Review None: ")?,
        }
        write!(
            f,
            "{}, {}, Employee: {}>",
            self.year, self.summary, self.employee_id
        )
    }
}

pub fn validate_year(year: i32) -> Result<(), ReviewValidationError> {
    if year < MIN_REVIEW_YEAR {
        return Err(ReviewValidationError::YearTooEarly {
            year,
            minimum: MIN_REVIEW_YEAR,
        });
    }
    Ok(())
}

pub fn validate_summary(summary: &str) -> Result<(), ReviewValidationError> {
    if summary.is_empty() {
        return Err(ReviewValidationError::EmptySummary);
    }
    Ok(())
}

// Deserialization goes through the same field checks as `validate`.
#[derive(Deserialize)]
struct ReviewWire {
    id: Option<ReviewId>,
    year: i32,
    summary: String,
    employee_id: EmployeeId,
}

impl TryFrom<ReviewWire> for Review {
    type Error = ReviewValidationError;

    fn try_from(value: ReviewWire) -> Result<Self, Self::Error> {
        let review = Self {
            id: value.id,
            year: value.year,
            summary: value.summary,
            employee_id: value.employee_id,
        };
        review.validate()?;
        Ok(review)
    }
}
