//! Employee repository and the existence-check capability reviews rely on.
//!
//! # Invariants
//! - `employees` is the single table referenced by `reviews.employee_id`.
//! - `employee_exists` queries storage directly; nothing is cached.

use crate::model::employee::{Employee, EmployeeId};
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT id, name, job_title FROM employees";

/// Answers whether an employee row exists.
pub trait EmployeeLookup {
    fn employee_exists(&self, id: EmployeeId) -> RepoResult<bool>;
}

/// Repository interface for the `employees` table.
pub trait EmployeeRepository: EmployeeLookup {
    fn create_table(&self) -> RepoResult<()>;
    fn drop_table(&self) -> RepoResult<()>;
    fn create(&self, name: &str, job_title: &str) -> RepoResult<Employee>;
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    fn get_all(&self) -> RepoResult<Vec<Employee>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EmployeeLookup for SqliteEmployeeRepository<'_> {
    fn employee_exists(&self, id: EmployeeId) -> RepoResult<bool> {
        let found = self
            .conn
            .query_row("SELECT id FROM employees WHERE id = ?1;", [id], |row| {
                row.get::<_, EmployeeId>(0)
            })
            .optional()?;
        Ok(found.is_some())
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS employees (
                id INTEGER PRIMARY KEY,
                name TEXT,
                job_title TEXT
            );",
        )?;
        Ok(())
    }

    fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch("DROP TABLE IF EXISTS employees;")?;
        Ok(())
    }

    fn create(&self, name: &str, job_title: &str) -> RepoResult<Employee> {
        let mut employee = Employee::new(name, job_title);
        employee.validate()?;

        self.conn.execute(
            "INSERT INTO employees (name, job_title) VALUES (?1, ?2);",
            params![employee.name.as_str(), employee.job_title.as_str()],
        )?;
        let id = self.conn.last_insert_rowid();
        employee.id = Some(id);

        info!("event=employee_create module=repo status=ok employee_id={id}");
        Ok(employee)
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    fn get_all(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id: EmployeeId = row.get("id")?;
    let name = row.get::<_, Option<String>>("name")?.ok_or_else(|| {
        RepoError::InvalidData(format!("null name in employees row {id}"))
    })?;
    let job_title = row.get::<_, Option<String>>("job_title")?.ok_or_else(|| {
        RepoError::InvalidData(format!("null job_title in employees row {id}"))
    })?;

    Ok(Employee {
        id: Some(id),
        name,
        job_title,
    })
}
