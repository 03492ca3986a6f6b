//! Employee domain model.
//!
//! Reviews only need to know that an employee row exists, so this model
//! carries the minimum the `employees` table stores.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// SQLite rowid of a persisted employee.
pub type EmployeeId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    EmptyName,
    EmptyJobTitle,
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "employee name must be a non-empty string"),
            Self::EmptyJobTitle => write!(f, "employee job title must be a non-empty string"),
        }
    }
}

impl Error for EmployeeValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Option<EmployeeId>,
    pub name: String,
    pub job_title: String,
}

impl Employee {
    /// Creates an unpersisted employee.
    pub fn new(name: impl Into<String>, job_title: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            job_title: job_title.into(),
        }
    }

    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.name.is_empty() {
            return Err(EmployeeValidationError::EmptyName);
        }
        if self.job_title.is_empty() {
            return Err(EmployeeValidationError::EmptyJobTitle);
        }
        Ok(())
    }
}

impl Display for Employee {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Employee {id}: {}, {}>", self.name, self.job_title),
            None => write!(f, "<Employee None: {}, {}>", self.name, self.job_title),
        }
    }
}
