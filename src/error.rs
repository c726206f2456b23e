use thiserror::Error;

/// Precondition failures raised by the repository before any SQL runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DepartmentError {
    #[error("department has no id; it must be created before it can be updated")]
    MissingId,
}
