use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::models::Department;

use super::departments::create_department;

/// Sample departments: (name, term, year, description, start, end, active).
const DEMO_DEPARTMENTS: &[(&str, &str, &str, &str, (i32, u32, u32), (i32, u32, u32), bool)] = &[
    (
        "Computer Science",
        "Fall",
        "2024",
        "Undergraduate computing cohort",
        (2024, 9, 2),
        (2024, 12, 20),
        true,
    ),
    (
        "Mathematics",
        "Fall",
        "2024",
        "Pure and applied mathematics",
        (2024, 9, 2),
        (2024, 12, 20),
        true,
    ),
    (
        "Science Fiction Studies",
        "Spring",
        "2024",
        "Literature seminar",
        (2024, 1, 15),
        (2024, 5, 10),
        false,
    ),
];

/// Sample students and the index of the department each one joins.
const DEMO_STUDENTS: &[(&str, &str, usize)] = &[
    ("Ada Lovelace", "ada@example.edu", 0),
    ("Alan Turing", "alan@example.edu", 0),
    ("Emmy Noether", "emmy@example.edu", 1),
    ("Ursula Le Guin", "ursula@example.edu", 2),
];

/// Populate an empty store with a few departments and enrolled students.
/// Returns `false` without touching anything when departments already exist.
pub fn seed_demo_data(conn: &Connection) -> Result<bool> {
    let existing: i64 = conn
        .query_row("SELECT COUNT(*) FROM departments", [], |row| row.get(0))
        .context("failed to count departments")?;
    if existing > 0 {
        return Ok(false);
    }

    let mut department_ids = Vec::with_capacity(DEMO_DEPARTMENTS.len());
    for &(name, term, year, description, start, end, active) in DEMO_DEPARTMENTS {
        let department = Department {
            description: Some(description.to_string()),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2),
            is_active: Some(active),
            ..Department::new(name, term, year)
        };
        let created = create_department(conn, &department)?;
        department_ids.push(created.id);
    }

    for &(name, email, department_index) in DEMO_STUDENTS {
        conn.execute(
            "INSERT INTO students (name, email) VALUES (?1, ?2)",
            params![name, email],
        )
        .context("failed to insert demo student")?;
        let student_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO student_department (studentId, departmentId) VALUES (?1, ?2)",
            params![student_id, department_ids[department_index]],
        )
        .context("failed to enrol demo student")?;
    }

    tracing::info!(
        departments = DEMO_DEPARTMENTS.len(),
        students = DEMO_STUDENTS.len(),
        "seeded demo data"
    );
    Ok(true)
}
