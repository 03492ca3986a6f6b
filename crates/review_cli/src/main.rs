//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire environment configuration into logging, storage and repositories.
//! - Print every stored review in its display form.
//!
//! Environment:
//! - `REVIEW_DB_PATH`: database file; in-memory when unset.
//! - `REVIEW_LOG_DIR`: absolute log directory; logging stays off when unset.
//! - `REVIEW_LOG_LEVEL`: log level; build-mode default when unset.

use log::info;
use review_core::{
    default_log_level, init_logging, open_db, open_db_in_memory, EmployeeRepository, LogConfig,
    ReviewRepository, SqliteEmployeeRepository, SqliteReviewRepository,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("review_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("REVIEW_LOG_DIR") {
        let level =
            std::env::var("REVIEW_LOG_LEVEL").unwrap_or_else(|_| default_log_level().to_string());
        init_logging(&LogConfig::new(&level, log_dir)?)?;
    }

    let conn = match std::env::var("REVIEW_DB_PATH") {
        Ok(path) => open_db(path)?,
        Err(_) => open_db_in_memory()?,
    };

    let employees = SqliteEmployeeRepository::new(&conn);
    let mut reviews = SqliteReviewRepository::new(&conn);
    employees.create_table()?;
    reviews.create_table()?;

    if reviews.get_all()?.is_empty() {
        let employee = employees.create("Lee", "Engineer")?;
        if let Some(employee_id) = employee.id {
            reviews.create(2023, "Demo review", employee_id)?;
            info!("event=cli_seed module=cli status=ok employee_id={employee_id}");
        }
    }

    println!("review_core version={}", review_core::core_version());
    for review in reviews.get_all()? {
        println!("{review}");
    }
    Ok(())
}
