use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Open (or create) the SQLite file at `path`, enable foreign keys, and make
/// sure every table exists. Parent directories are created on demand.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open SQLite database at {}", path.display()))?;
    prepare(&conn)?;
    tracing::info!(path = %path.display(), "opened department store");
    Ok(conn)
}

/// In-memory store with the full schema. Used by tests and throwaway sessions.
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    prepare(&conn)?;
    Ok(conn)
}

fn prepare(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;
    ensure_schema(conn)
}

/// Create the three tables if they are missing. This is not a migration
/// system: existing tables are left exactly as they are.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS departments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            term TEXT NOT NULL,
            year TEXT NOT NULL,
            description TEXT,
            startDate TEXT,
            endDate TEXT,
            isActive INTEGER
        )",
        [],
    )
    .context("failed to create departments table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT
        )",
        [],
    )
    .context("failed to create students table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS student_department (
            studentId INTEGER NOT NULL,
            departmentId INTEGER NOT NULL,
            PRIMARY KEY (studentId, departmentId),
            FOREIGN KEY(studentId) REFERENCES students(id) ON DELETE CASCADE,
            FOREIGN KEY(departmentId) REFERENCES departments(id) ON DELETE CASCADE
        )",
        [],
    )
    .context("failed to create student_department table")?;

    Ok(())
}
