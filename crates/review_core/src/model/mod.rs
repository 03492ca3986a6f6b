//! Domain model for the review record-keeping core.
//!
//! # Responsibility
//! - Define the value types mapped onto `reviews` and `employees` rows.
//! - Keep storage-independent validation next to the data it checks.
//!
//! # Invariants
//! - Row identity is the SQLite rowid; `None` means "not yet persisted".

pub mod employee;
pub mod review;
