//! Review repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the `reviews` table DDL and row mapping.
//! - Validate new reviews, including the employee reference, before insert.
//! - Keep the repository's identity map in step with its own writes.
//!
//! # Invariants
//! - `create` and `assign_employee` reject unknown employee ids before any
//!   SQL mutation.
//! - `update` writes caller values as-is; only storage constraints apply.
//! - `find_by_id` and `get_all` always read from storage and never touch
//!   the identity map.
//! - Log events carry ids only, never summary text.

use crate::model::employee::EmployeeId;
use crate::model::review::{
    validate_summary, validate_year, Review, ReviewId, ReviewValidationError,
};
use crate::repo::employee_repo::{EmployeeLookup, SqliteEmployeeRepository};
use crate::repo::identity_map::IdentityMap;
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use rusqlite::{params, Connection, Row};

const REVIEW_SELECT_SQL: &str = "SELECT id, year, summary, employee_id FROM reviews";

/// Repository interface for review persistence.
pub trait ReviewRepository {
    /// Creates `reviews` if it does not exist.
    fn create_table(&self) -> RepoResult<()>;
    /// Drops `reviews` if it exists.
    fn drop_table(&self) -> RepoResult<()>;
    /// Validates, builds and saves a new review.
    fn create(&mut self, year: i32, summary: &str, employee_id: EmployeeId) -> RepoResult<Review>;
    /// Inserts an unpersisted review and registers it in the identity map.
    fn save(&mut self, review: &mut Review) -> RepoResult<ReviewId>;
    /// Writes the review's current fields to its row.
    fn update(&mut self, review: &Review) -> RepoResult<()>;
    /// Deletes the review's row and clears its id.
    fn delete(&mut self, review: &mut Review) -> RepoResult<()>;
    fn find_by_id(&self, id: ReviewId) -> RepoResult<Option<Review>>;
    fn get_all(&self) -> RepoResult<Vec<Review>>;
    /// Sets `review.employee_id` after checking the employee exists.
    fn assign_employee(&self, review: &mut Review, employee_id: EmployeeId) -> RepoResult<()>;
}

/// SQLite-backed review repository.
pub struct SqliteReviewRepository<'conn> {
    conn: &'conn Connection,
    identity_map: IdentityMap<Review>,
}

impl<'conn> SqliteReviewRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            identity_map: IdentityMap::new(),
        }
    }

    /// Canonical values for every review saved through this repository.
    pub fn identity_map(&self) -> &IdentityMap<Review> {
        &self.identity_map
    }

    pub fn cached(&self, id: ReviewId) -> Option<&Review> {
        self.identity_map.get(id)
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY,
                year INT,
                summary TEXT,
                employee_id INTEGER,
                FOREIGN KEY (employee_id) REFERENCES employees(id)
            );",
        )?;
        Ok(())
    }

    fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch("DROP TABLE IF EXISTS reviews;")?;
        Ok(())
    }

    fn create(&mut self, year: i32, summary: &str, employee_id: EmployeeId) -> RepoResult<Review> {
        validate_year(year)?;
        validate_summary(summary)?;

        let mut review = Review::new(year, summary, employee_id);
        self.assign_employee(&mut review, employee_id)?;
        self.save(&mut review)?;
        Ok(review)
    }

    fn save(&mut self, review: &mut Review) -> RepoResult<ReviewId> {
        if let Some(id) = review.id {
            return Err(RepoError::AlreadyPersisted(id));
        }

        self.conn.execute(
            "INSERT INTO reviews (year, summary, employee_id) VALUES (?1, ?2, ?3);",
            params![review.year, review.summary.as_str(), review.employee_id],
        )?;
        let id = self.conn.last_insert_rowid();
        review.id = Some(id);
        self.identity_map.register(id, review.clone());

        info!(
            "event=review_save module=repo status=ok review_id={id} employee_id={}",
            review.employee_id
        );
        Ok(id)
    }

    fn update(&mut self, review: &Review) -> RepoResult<()> {
        let id = review.id.ok_or(RepoError::NotPersisted)?;

        let changed = self.conn.execute(
            "UPDATE reviews
             SET year = ?1, summary = ?2, employee_id = ?3
             WHERE id = ?4;",
            params![review.year, review.summary.as_str(), review.employee_id, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        if let Some(cached) = self.identity_map.get_mut(id) {
            *cached = review.clone();
        }

        info!("event=review_update module=repo status=ok review_id={id}");
        Ok(())
    }

    fn delete(&mut self, review: &mut Review) -> RepoResult<()> {
        let id = review.id.ok_or(RepoError::NotPersisted)?;

        let changed = self
            .conn
            .execute("DELETE FROM reviews WHERE id = ?1;", [id])?;
        let evicted = self.identity_map.evict(id);

        if changed == 0 && evicted.is_none() {
            warn!("event=review_delete module=repo status=error review_id={id} error_code=not_found");
            return Err(RepoError::NotFound(id));
        }
        review.id = None;
        info!(
            "event=review_delete module=repo status=ok review_id={id} cached={}",
            evicted.is_some()
        );
        Ok(())
    }

    fn find_by_id(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REVIEW_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_review_row(row)?));
        }
        Ok(None)
    }

    fn get_all(&self) -> RepoResult<Vec<Review>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REVIEW_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut reviews = Vec::new();
        while let Some(row) = rows.next()? {
            reviews.push(parse_review_row(row)?);
        }
        Ok(reviews)
    }

    fn assign_employee(&self, review: &mut Review, employee_id: EmployeeId) -> RepoResult<()> {
        let employees = SqliteEmployeeRepository::new(self.conn);
        if !employees.employee_exists(employee_id)? {
            return Err(ReviewValidationError::UnknownEmployee(employee_id).into());
        }
        review.employee_id = employee_id;
        Ok(())
    }
}

fn parse_review_row(row: &Row<'_>) -> RepoResult<Review> {
    let id: ReviewId = row.get("id")?;
    let year = row
        .get::<_, Option<i32>>("year")?
        .ok_or_else(|| RepoError::InvalidData(format!("null year in reviews row {id}")))?;
    let summary = row
        .get::<_, Option<String>>("summary")?
        .ok_or_else(|| RepoError::InvalidData(format!("null summary in reviews row {id}")))?;
    let employee_id = row
        .get::<_, Option<EmployeeId>>("employee_id")?
        .ok_or_else(|| {
            RepoError::InvalidData(format!("null employee_id in reviews row {id}"))
        })?;

    Ok(Review {
        id: Some(id),
        year,
        summary,
        employee_id,
    })
}
