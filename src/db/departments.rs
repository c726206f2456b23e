use std::fmt::Display;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::DepartmentError;
use crate::models::Department;

/// Column list shared by every department query. The order must match
/// `department_from_row`.
const DEPARTMENT_COLUMNS: &str =
    "id, name, term, year, description, startDate, endDate, isActive";

/// Insert a new department and echo it back with the store-assigned id. Any
/// `id` already present on the input is ignored.
pub fn create_department(conn: &Connection, department: &Department) -> Result<Department> {
    // Unset optional fields bind as `None`, which rusqlite sends as SQL NULL.
    let result = conn
        .execute(
            "INSERT INTO departments (name, term, year, description, startDate, endDate, isActive)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                department.name,
                department.term,
                department.year,
                department.description,
                department.start_date,
                department.end_date,
                department.is_active,
            ],
        )
        .context("failed to insert department")
        .map(|_| Department {
            id: Some(conn.last_insert_rowid()),
            ..department.clone()
        });

    let created = log_failure(result, "create", &department.name)?;
    tracing::info!(id = ?created.id, name = %created.name, "created department");
    Ok(created)
}

/// Every department, sorted by name.
pub fn fetch_departments(conn: &Connection) -> Result<Vec<Department>> {
    let result = query_departments(
        conn,
        &format!("SELECT {DEPARTMENT_COLUMNS} FROM departments ORDER BY name"),
        params![],
    );
    log_failure(result, "list", &"*")
}

/// Look up a single department. A missing row is `Ok(None)`, not an error.
pub fn fetch_department(conn: &Connection, id: i64) -> Result<Option<Department>> {
    let result = conn
        .query_row(
            &format!("SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = ?1"),
            params![id],
            department_from_row,
        )
        .optional()
        .context("failed to load department");
    log_failure(result, "get", &id)
}

/// Overwrite every column of an existing department, `is_active` included.
/// Returns whether a row was changed. A department without an id is rejected
/// before the statement is prepared.
pub fn update_department(conn: &Connection, department: &Department) -> Result<bool> {
    let Some(id) = department.id else {
        return log_failure(
            Err(DepartmentError::MissingId.into()),
            "update",
            &department.name,
        );
    };

    let result = conn
        .execute(
            "UPDATE departments
             SET name = ?1, term = ?2, year = ?3, description = ?4,
                 startDate = ?5, endDate = ?6, isActive = ?7
             WHERE id = ?8",
            params![
                department.name,
                department.term,
                department.year,
                department.description,
                department.start_date,
                department.end_date,
                department.is_active,
                id,
            ],
        )
        .context("failed to update department");

    let updated = log_failure(result, "update", &id)?;
    Ok(updated > 0)
}

/// Hard-delete a department. Returns whether a row was removed. Enrolment
/// rows in `student_department` go with it through the cascade.
pub fn delete_department(conn: &Connection, id: i64) -> Result<bool> {
    let result = conn
        .execute("DELETE FROM departments WHERE id = ?1", params![id])
        .context("failed to delete department");
    let deleted = log_failure(result, "delete", &id)?;
    Ok(deleted > 0)
}

/// Departments whose name contains `fragment`, sorted by name. Wildcards in
/// the fragment are escaped so it always matches literally; case folding
/// follows SQLite's `LIKE` (ASCII case-insensitive).
pub fn search_departments(conn: &Connection, fragment: &str) -> Result<Vec<Department>> {
    let pattern = format!("%{}%", escape_like(fragment));
    let result = query_departments(
        conn,
        &format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments
             WHERE name LIKE ?1 ESCAPE '\\'
             ORDER BY name"
        ),
        params![pattern],
    );
    log_failure(result, "search", &fragment)
}

fn query_departments(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Department>> {
    let mut stmt = conn
        .prepare(sql)
        .context("failed to prepare department query")?;

    let departments = stmt
        .query_map(params, department_from_row)
        .context("failed to load departments")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect departments")?;

    Ok(departments)
}

fn department_from_row(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        term: row.get(2)?,
        year: row.get(3)?,
        description: row.get(4)?,
        start_date: row.get(5)?,
        end_date: row.get(6)?,
        is_active: row.get(7)?,
    })
}

fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for ch in fragment.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Record the failing operation and its key, then hand the error back
/// unchanged. Nothing in this module swallows a store error.
fn log_failure<T>(result: Result<T>, operation: &'static str, key: &dyn Display) -> Result<T> {
    if let Err(err) = &result {
        tracing::error!(operation, key = %key, "department query failed: {err:#}");
    }
    result
}
