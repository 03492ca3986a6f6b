use review_core::{
    open_db_in_memory, EmployeeId, EmployeeRepository, RepoError, Review, ReviewRepository,
    ReviewValidationError, SqliteEmployeeRepository, SqliteReviewRepository,
};
use rusqlite::Connection;

fn setup() -> (Connection, EmployeeId) {
    let conn = open_db_in_memory().unwrap();
    let employees = SqliteEmployeeRepository::new(&conn);
    employees.create_table().unwrap();
    let employee = employees.create("Lee", "Manager").unwrap();
    SqliteReviewRepository::new(&conn).create_table().unwrap();
    (conn, employee.id.unwrap())
}

fn review_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM reviews;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_persists_and_find_by_id_reads_back() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);

    let review = repo.create(2021, "Good work", employee_id).unwrap();
    let id = review.id.expect("created review should have an id");

    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.year, 2021);
    assert_eq!(loaded.summary, "Good work");
    assert_eq!(loaded.employee_id, employee_id);
}

#[test]
fn create_rejects_year_before_2000_without_inserting() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);

    let err = repo.create(1999, "Too early", employee_id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidReview(ReviewValidationError::YearTooEarly {
            year: 1999,
            minimum: 2000
        })
    ));
    assert_eq!(review_count(&conn), 0);
    assert!(repo.identity_map().is_empty());
}

#[test]
fn create_accepts_boundary_year() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);

    let review = repo.create(2000, "First year", employee_id).unwrap();
    assert!(review.is_persisted());
}

#[test]
fn create_rejects_empty_summary() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);

    let err = repo.create(2021, "", employee_id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidReview(ReviewValidationError::EmptySummary)
    ));
    assert_eq!(review_count(&conn), 0);
}

#[test]
fn create_rejects_unknown_employee() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);
    let missing = employee_id + 100;

    let err = repo.create(2021, "Ghost", missing).unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidReview(ReviewValidationError::UnknownEmployee(id)) if id == missing
    ));
    assert_eq!(review_count(&conn), 0);
}

#[test]
fn save_registers_canonical_value_in_identity_map() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);

    let mut review = Review::new(2022, "Solid year", employee_id);
    let id = repo.save(&mut review).unwrap();

    assert_eq!(review.id, Some(id));
    assert_eq!(repo.cached(id), Some(&review));
    assert_eq!(repo.identity_map().ids(), vec![id]);
}

#[test]
fn save_rejects_already_persisted_review() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);

    let mut review = repo.create(2022, "Once", employee_id).unwrap();
    let id = review.id.unwrap();

    let err = repo.save(&mut review).unwrap_err();
    assert!(matches!(err, RepoError::AlreadyPersisted(existing) if existing == id));
    assert_eq!(review_count(&conn), 1);
}

#[test]
fn update_persists_changed_year_and_refreshes_cache() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);

    let mut review = repo.create(2021, "Good work", employee_id).unwrap();
    let id = review.id.unwrap();

    review.year = 2023;
    repo.update(&review).unwrap();

    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.year, 2023);
    assert_eq!(repo.cached(id).map(|cached| cached.year), Some(2023));
}

#[test]
fn update_does_not_revalidate_fields() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);

    let mut review = repo.create(2021, "Good work", employee_id).unwrap();
    review.year = 1990;
    review.summary.clear();
    repo.update(&review).unwrap();

    let loaded = repo.find_by_id(review.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded.year, 1990);
    assert_eq!(loaded.summary, "");
}

#[test]
fn update_to_unknown_employee_fails_at_storage_level() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);

    let mut review = repo.create(2021, "Good work", employee_id).unwrap();
    review.employee_id = employee_id + 100;

    let err = repo.update(&review).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn update_requires_persisted_review_and_existing_row() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);

    let unsaved = Review::new(2021, "Draft", employee_id);
    assert!(matches!(
        repo.update(&unsaved).unwrap_err(),
        RepoError::NotPersisted
    ));

    let mut stale = Review::new(2021, "Stale", employee_id);
    stale.id = Some(404);
    assert!(matches!(
        repo.update(&stale).unwrap_err(),
        RepoError::NotFound(404)
    ));
}

#[test]
fn delete_removes_row_and_cache_entry_and_clears_id() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);

    let mut review = repo.create(2021, "Good work", employee_id).unwrap();
    let id = review.id.unwrap();

    repo.delete(&mut review).unwrap();

    assert_eq!(review.id, None);
    assert!(repo.find_by_id(id).unwrap().is_none());
    assert!(!repo.identity_map().contains(id));

    assert!(matches!(
        repo.delete(&mut review).unwrap_err(),
        RepoError::NotPersisted
    ));
}

#[test]
fn delete_unknown_id_returns_not_found() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);

    let mut ghost = Review::new(2021, "Ghost", employee_id);
    ghost.id = Some(77);

    let err = repo.delete(&mut ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(77)));
    assert_eq!(ghost.id, Some(77));
}

#[test]
fn delete_accepts_review_loaded_by_another_repository() {
    let (conn, employee_id) = setup();
    let mut writer = SqliteReviewRepository::new(&conn);
    let id = writer.create(2021, "Shared", employee_id).unwrap().id.unwrap();

    let mut reader = SqliteReviewRepository::new(&conn);
    let mut loaded = reader.find_by_id(id).unwrap().unwrap();
    reader.delete(&mut loaded).unwrap();

    assert!(writer.find_by_id(id).unwrap().is_none());
    // The writer's cache is not reconciled with deletes made elsewhere.
    assert!(writer.identity_map().contains(id));
}

#[test]
fn find_by_id_returns_fresh_values_without_touching_cache() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);
    let id = repo.create(2021, "Good work", employee_id).unwrap().id.unwrap();

    let mut first = repo.find_by_id(id).unwrap().unwrap();
    let second = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(first, second);

    first.summary = String::from("edited locally");
    assert_ne!(first, second);
    assert_eq!(repo.cached(id).map(|r| r.summary.as_str()), Some("Good work"));
    assert_eq!(repo.identity_map().len(), 1);
}

#[test]
fn find_by_id_missing_returns_none() {
    let (conn, _) = setup();
    let repo = SqliteReviewRepository::new(&conn);
    assert!(repo.find_by_id(12345).unwrap().is_none());
}

#[test]
fn get_all_returns_every_row_in_id_order() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);
    repo.create(2021, "First", employee_id).unwrap();
    repo.create(2022, "Second", employee_id).unwrap();
    repo.create(2023, "Third", employee_id).unwrap();

    let all = repo.get_all().unwrap();
    let summaries: Vec<&str> = all.iter().map(|r| r.summary.as_str()).collect();
    assert_eq!(summaries, vec!["First", "Second", "Third"]);
    assert!(all.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[test]
fn get_all_reads_rows_written_outside_the_repository() {
    let (conn, employee_id) = setup();
    conn.execute(
        "INSERT INTO reviews (year, summary, employee_id) VALUES (2024, 'external', ?1);",
        [employee_id],
    )
    .unwrap();

    let repo = SqliteReviewRepository::new(&conn);
    let all = repo.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].summary, "external");
    assert!(repo.identity_map().is_empty());
}

#[test]
fn null_column_is_reported_as_invalid_data() {
    let (conn, employee_id) = setup();
    conn.execute(
        "INSERT INTO reviews (year, summary, employee_id) VALUES (NULL, 'no year', ?1);",
        [employee_id],
    )
    .unwrap();

    let repo = SqliteReviewRepository::new(&conn);
    let err = repo.get_all().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("year")));
}

#[test]
fn assign_employee_checks_existence_before_setting() {
    let (conn, employee_id) = setup();
    let repo = SqliteReviewRepository::new(&conn);
    let other = SqliteEmployeeRepository::new(&conn)
        .create("Sam", "Analyst")
        .unwrap()
        .id
        .unwrap();

    let mut review = Review::new(2021, "Reassign me", employee_id);
    repo.assign_employee(&mut review, other).unwrap();
    assert_eq!(review.employee_id, other);

    let err = repo.assign_employee(&mut review, 9999).unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidReview(ReviewValidationError::UnknownEmployee(9999))
    ));
    assert_eq!(review.employee_id, other);
}

#[test]
fn table_ddl_is_idempotent() {
    let (conn, employee_id) = setup();
    let mut repo = SqliteReviewRepository::new(&conn);

    repo.create_table().unwrap();
    repo.create(2021, "Survives second create_table", employee_id)
        .unwrap();
    repo.create_table().unwrap();
    assert_eq!(review_count(&conn), 1);

    repo.drop_table().unwrap();
    repo.drop_table().unwrap();
    assert!(repo.get_all().is_err());

    repo.create_table().unwrap();
    assert!(repo.get_all().unwrap().is_empty());
}
