//! Core library surface for the department admin TUI.
//!
//! `db` is the repository over the embedded SQLite store, `ui` is the screen
//! controller built on top of it. The binary only wires configuration,
//! logging, and the event loop together.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

/// Repository operations, re-exported for the binary and for tests.
pub use db::{
    create_department, delete_department, fetch_department, fetch_departments,
    fetch_students_for_department, open_database, open_memory, search_departments,
    seed_demo_data, update_department,
};

pub use error::DepartmentError;
pub use models::{Department, Student};

/// The interactive application entry point and state container.
pub use ui::{run_app, App, ScreenState};
