//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. They stay light-weight data holders so the persistence and
//! presentation layers can focus on their own concerns.

use std::fmt;

use chrono::NaiveDate;

/// One academic offering period (a term or cohort).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Department {
    /// Primary key assigned by the store. `None` until the row is created.
    pub id: Option<i64>,
    /// Display name, also the sort key for every list query.
    pub name: String,
    /// Term label such as "Fall" or "Spring".
    pub term: String,
    /// Free-form year text. Not validated as numeric.
    pub year: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Unset means the flag was never recorded for this row.
    pub is_active: Option<bool>,
}

impl Department {
    /// Build an unsaved department with only the required fields populated.
    pub fn new(name: impl Into<String>, term: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            term: term.into(),
            year: year.into(),
            ..Self::default()
        }
    }

    /// `Term Year` label shown next to the name in lists.
    pub fn period(&self) -> String {
        format!("{} {}", self.term.trim(), self.year.trim())
            .trim()
            .to_string()
    }

    /// Human label for the active flag, used by list rows and the roster header.
    pub fn status_label(&self) -> &'static str {
        match self.is_active {
            Some(true) => "active",
            Some(false) => "inactive",
            None => "unset",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let period = self.period();
        if period.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({period})", self.name)
        }
    }
}

/// A student row as returned through the `student_department` join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}
