use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::Student;

/// Students enrolled in a department, resolved through `student_department`
/// and ordered by name for the roster overlay.
pub fn fetch_students_for_department(conn: &Connection, department_id: i64) -> Result<Vec<Student>> {
    let result = query_students(conn, department_id);
    if let Err(err) = &result {
        tracing::error!(
            operation = "list_students",
            department_id,
            "student query failed: {err:#}"
        );
    }
    result
}

fn query_students(conn: &Connection, department_id: i64) -> Result<Vec<Student>> {
    let mut stmt = conn
        .prepare(
            "SELECT s.id, s.name, s.email
             FROM students s
             INNER JOIN student_department sd ON sd.studentId = s.id
             WHERE sd.departmentId = ?1
             ORDER BY s.name COLLATE NOCASE",
        )
        .context("failed to prepare department students query")?;

    let students = stmt
        .query_map(params![department_id], |row| {
            Ok(Student {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
            })
        })
        .context("failed to iterate department students")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect department students")?;

    Ok(students)
}
