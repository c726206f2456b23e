//! Persistence module split across logical submodules. Each function wraps a
//! single parameterized statement so the screen controller never builds SQL.

mod connection;
mod departments;
mod seed;
mod students;

pub use connection::{ensure_schema, open_database, open_memory};
pub use departments::{
    create_department, delete_department, fetch_department, fetch_departments,
    search_departments, update_department,
};
pub use seed::seed_demo_data;
pub use students::fetch_students_for_department;
