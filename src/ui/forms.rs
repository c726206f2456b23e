use chrono::NaiveDate;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use thiserror::Error;

use crate::models::Department;

/// Date format accepted by the start/end fields.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fields of the department form, in focus order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Term,
    Year,
    Description,
    StartDate,
    EndDate,
    Active,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Name,
        FormField::Term,
        FormField::Year,
        FormField::Description,
        FormField::StartDate,
        FormField::EndDate,
        FormField::Active,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Term => "Term",
            FormField::Year => "Year",
            FormField::Description => "Description",
            FormField::StartDate => "Start date",
            FormField::EndDate => "End date",
            FormField::Active => "Active",
        }
    }

    fn required(self) -> bool {
        matches!(self, FormField::Name | FormField::Term | FormField::Year)
    }

    fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or_default()
    }
}

/// Client-side validation failures. These never reach the repository.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required.")]
    Required(&'static str),
    #[error("{0} must be a date like 2024-09-01.")]
    InvalidDate(&'static str),
}

/// In-progress add/edit draft. Text fields hold raw input; conversion to a
/// typed `Department` happens only on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentForm {
    pub(crate) id: Option<i64>,
    pub(crate) name: String,
    pub(crate) term: String,
    pub(crate) year: String,
    pub(crate) description: String,
    pub(crate) start_date: String,
    pub(crate) end_date: String,
    pub(crate) is_active: Option<bool>,
    pub(crate) focused: FormField,
}

impl DepartmentForm {
    /// Empty draft for the Add flow. New departments start out active.
    pub fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
            term: String::new(),
            year: String::new(),
            description: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            is_active: Some(true),
            focused: FormField::Name,
        }
    }

    /// Copy of an existing department for the Edit flow.
    pub fn from_department(department: &Department) -> Self {
        Self {
            id: department.id,
            name: department.name.clone(),
            term: department.term.clone(),
            year: department.year.clone(),
            description: department.description.clone().unwrap_or_default(),
            start_date: format_date(department.start_date),
            end_date: format_date(department.end_date),
            is_active: department.is_active,
            focused: FormField::Name,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn focused(&self) -> FormField {
        self.focused
    }

    pub fn is_active(&self) -> Option<bool> {
        self.is_active
    }

    /// Raw text of a field. The active flag renders as `yes`/`no`/empty.
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Term => &self.term,
            FormField::Year => &self.year,
            FormField::Description => &self.description,
            FormField::StartDate => &self.start_date,
            FormField::EndDate => &self.end_date,
            FormField::Active => match self.is_active {
                Some(true) => "yes",
                Some(false) => "no",
                None => "",
            },
        }
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::Term => Some(&mut self.term),
            FormField::Year => Some(&mut self.year),
            FormField::Description => Some(&mut self.description),
            FormField::StartDate => Some(&mut self.start_date),
            FormField::EndDate => Some(&mut self.end_date),
            FormField::Active => None,
        }
    }

    pub fn focus(&mut self, field: FormField) {
        self.focused = field;
    }

    /// Move focus forward, wrapping after the last field.
    pub fn next_field(&mut self) {
        let next = (self.focused.position() + 1) % FormField::ALL.len();
        self.focused = FormField::ALL[next];
    }

    /// Move focus backward, wrapping before the first field.
    pub fn previous_field(&mut self) {
        let len = FormField::ALL.len();
        let previous = (self.focused.position() + len - 1) % len;
        self.focused = FormField::ALL[previous];
    }

    /// Append a character to the focused text field. Control characters and
    /// input on the active toggle are rejected.
    pub fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.text_mut(self.focused) {
            Some(value) => {
                value.push(ch);
                true
            }
            None => false,
        }
    }

    pub fn backspace(&mut self) {
        if let Some(value) = self.text_mut(self.focused) {
            value.pop();
        }
    }

    /// Flip the active flag. An unset flag becomes active.
    pub fn toggle_active(&mut self) {
        self.is_active = Some(!self.is_active.unwrap_or(false));
    }

    /// Validate the draft and produce the department to persist. Name, term
    /// and year must be non-blank; dates must parse when present.
    pub fn to_department(&self) -> Result<Department, FormError> {
        for field in [FormField::Name, FormField::Term, FormField::Year] {
            if self.value(field).trim().is_empty() {
                return Err(FormError::Required(field.label()));
            }
        }

        let description = self.description.trim();
        Ok(Department {
            id: self.id,
            name: self.name.trim().to_string(),
            term: self.term.trim().to_string(),
            year: self.year.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            start_date: parse_date(&self.start_date, FormField::StartDate)?,
            end_date: parse_date(&self.end_date, FormField::EndDate)?,
            is_active: self.is_active,
        })
    }

    /// Render one field line for the modal.
    pub(crate) fn build_line(&self, field: FormField) -> Line<'static> {
        let value = self.value(field);
        let is_focused = self.focused == field;

        let display = if value.is_empty() {
            match field {
                FormField::StartDate | FormField::EndDate => "<YYYY-MM-DD>".to_string(),
                FormField::Active => "<unset>".to_string(),
                _ if field.required() => "<required>".to_string(),
                _ => "<optional>".to_string(),
            }
        } else {
            value.to_string()
        };

        let style = if is_focused {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Character count of a field, used for cursor placement.
    pub(crate) fn value_len(&self, field: FormField) -> usize {
        self.value(field).chars().count()
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn parse_date(raw: &str, field: FormField) -> Result<Option<NaiveDate>, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| FormError::InvalidDate(field.label()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(form: &mut DepartmentForm, field: FormField, text: &str) {
        form.focus(field);
        for ch in text.chars() {
            form.push_char(ch);
        }
    }

    #[test]
    fn blank_form_requires_name_first() {
        let form = DepartmentForm::blank();
        assert_eq!(form.to_department(), Err(FormError::Required("Name")));
    }

    #[test]
    fn whitespace_only_year_is_rejected() {
        let mut form = DepartmentForm::blank();
        typed(&mut form, FormField::Name, "CS");
        typed(&mut form, FormField::Term, "Fall");
        typed(&mut form, FormField::Year, "   ");
        assert_eq!(form.to_department(), Err(FormError::Required("Year")));
    }

    #[test]
    fn valid_draft_trims_and_drops_empty_optionals() {
        let mut form = DepartmentForm::blank();
        typed(&mut form, FormField::Name, " CS ");
        typed(&mut form, FormField::Term, "Fall");
        typed(&mut form, FormField::Year, "2024");
        typed(&mut form, FormField::StartDate, "2024-09-02");

        let department = form.to_department().unwrap();
        assert_eq!(department.id, None);
        assert_eq!(department.name, "CS");
        assert_eq!(department.description, None);
        assert_eq!(department.start_date, NaiveDate::from_ymd_opt(2024, 9, 2));
        assert_eq!(department.end_date, None);
        assert_eq!(department.is_active, Some(true));
    }

    #[test]
    fn malformed_date_is_reported_by_field() {
        let mut form = DepartmentForm::from_department(&Department::new("CS", "Fall", "2024"));
        typed(&mut form, FormField::EndDate, "next week");
        assert_eq!(form.to_department(), Err(FormError::InvalidDate("End date")));
    }

    #[test]
    fn year_accepts_free_text() {
        let mut form = DepartmentForm::blank();
        typed(&mut form, FormField::Name, "CS");
        typed(&mut form, FormField::Term, "Fall");
        typed(&mut form, FormField::Year, "2024/25");
        assert_eq!(form.to_department().unwrap().year, "2024/25");
    }

    #[test]
    fn edit_form_round_trips_unset_active_flag() {
        let mut department = Department::new("CS", "Fall", "2024");
        department.id = Some(7);
        let form = DepartmentForm::from_department(&department);
        let saved = form.to_department().unwrap();
        assert_eq!(saved.id, Some(7));
        assert_eq!(saved.is_active, None);
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut form = DepartmentForm::blank();
        form.previous_field();
        assert_eq!(form.focused(), FormField::Active);
        form.next_field();
        assert_eq!(form.focused(), FormField::Name);
    }

    #[test]
    fn active_field_ignores_typing_but_toggles() {
        let mut form = DepartmentForm::blank();
        form.focus(FormField::Active);
        assert!(!form.push_char('x'));
        form.toggle_active();
        assert_eq!(form.is_active(), Some(false));
        form.backspace();
        assert_eq!(form.is_active(), Some(false));
    }
}
