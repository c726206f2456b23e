//! Screen state for the department list. Every user intent and every
//! repository completion flows through [`ScreenState::update`], which is the
//! only place state changes. A repository call happens exactly when `update`
//! hands back a [`Request`].
//!
//! Requests carry a monotonically increasing id. Only the completion for the
//! most recently issued request is applied; anything older is dropped so a
//! slow response can never overwrite fresher state.

use crate::models::{Department, Student};

use super::forms::{DepartmentForm, FormField};

/// Sequence number attached to every dispatched request.
pub type RequestId = u64;

/// Categories of repository work, used to pick failure messages.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    Load,
    Search,
    Save,
    Delete,
    Roster,
}

impl Operation {
    /// Fixed user-facing text shown when a request of this kind fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Load => "Could not load departments.",
            Operation::Search => "Could not search departments.",
            Operation::Save => "Could not save the department.",
            Operation::Delete => "Could not delete the department.",
            Operation::Roster => "Could not load students for this department.",
        }
    }
}

/// Which list query to re-run after a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    All,
    Search(String),
}

impl Refresh {
    /// A blank query lists everything; anything else re-runs the search.
    pub fn for_query(query: &str) -> Self {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            Refresh::All
        } else {
            Refresh::Search(trimmed.to_string())
        }
    }

    /// Category reported when the refresh query itself fails.
    pub fn operation(&self) -> Operation {
        match self {
            Refresh::All => Operation::Load,
            Refresh::Search(_) => Operation::Search,
        }
    }
}

/// Repository work requested by the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load,
    Search(String),
    Create {
        department: Department,
        refresh: Refresh,
    },
    Update {
        department: Department,
        refresh: Refresh,
    },
    Delete {
        id: i64,
        refresh: Refresh,
    },
    Roster(Department),
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Command::Load => Operation::Load,
            Command::Search(_) => Operation::Search,
            Command::Create { .. } | Command::Update { .. } => Operation::Save,
            Command::Delete { .. } => Operation::Delete,
            Command::Roster(_) => Operation::Roster,
        }
    }
}

impl From<Refresh> for Command {
    fn from(refresh: Refresh) -> Self {
        match refresh {
            Refresh::All => Command::Load,
            Refresh::Search(query) => Command::Search(query),
        }
    }
}

/// A command tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: RequestId,
    pub command: Command,
}

/// Result of executing a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Fresh department list from a load or a search.
    Departments(Vec<Department>),
    /// A create, update or delete committed. `departments` is the list
    /// re-queried afterwards, or `None` when that query failed with
    /// `refresh` as its category.
    Written {
        departments: Option<Vec<Department>>,
        refresh: Operation,
    },
    Roster {
        department: Department,
        students: Vec<Student>,
    },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub request: RequestId,
    pub operation: Operation,
    pub outcome: Outcome,
}

/// Single-character edits shared by the search bar and the form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextInput {
    Char(char),
    Backspace,
}

/// Everything the screen can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Mount,
    Retry,
    FocusSearch,
    SearchInput(TextInput),
    SubmitSearch,
    ClearSearch,
    MoveSelection(isize),
    OpenAdd,
    OpenEdit,
    FormInput(TextInput),
    NextField,
    PreviousField,
    ToggleActive,
    Cancel,
    Save,
    DismissPrompt,
    RequestDelete,
    ConfirmDelete,
    DeclineDelete,
    OpenRoster,
    CloseRoster,
    Completed(Completion),
}

/// The add/edit overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub form: DepartmentForm,
    /// `true` for Update, `false` for Create.
    pub editing: bool,
}

/// Students of one department, shown as an overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub department: Department,
    pub students: Vec<Student>,
}

/// Mutually exclusive body of the screen, in priority order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum View<'a> {
    Loading,
    Error(&'a str),
    Content,
}

#[derive(Debug, Default)]
pub struct ScreenState {
    departments: Vec<Department>,
    selected: usize,
    query: String,
    search_focused: bool,
    modal: Option<Modal>,
    prompt: Option<String>,
    confirm_delete: Option<Department>,
    roster: Option<Roster>,
    error: Option<&'static str>,
    notice: Option<String>,
    pending: Option<(RequestId, Operation)>,
    last_issued: RequestId,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Department> {
        self.departments.get(self.selected)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn modal_open(&self) -> bool {
        self.modal.is_some()
    }

    pub fn editing(&self) -> bool {
        self.modal.as_ref().is_some_and(|modal| modal.editing)
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn confirm_delete(&self) -> Option<&Department> {
        self.confirm_delete.as_ref()
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    /// Id of the request whose completion will be applied, if any.
    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending.map(|(id, _)| id)
    }

    /// Loading masks the error view, which masks the content.
    pub fn view(&self) -> View<'_> {
        if self.loading() {
            View::Loading
        } else if let Some(message) = self.error {
            View::Error(message)
        } else {
            View::Content
        }
    }

    /// Apply one action. Returns the repository request to run, if the action
    /// calls for one.
    pub fn update(&mut self, action: Action) -> Option<Request> {
        match action {
            Action::Mount => Some(self.dispatch(Command::Load)),
            Action::Retry => {
                let command = Refresh::for_query(&self.query).into();
                Some(self.dispatch(command))
            }
            Action::FocusSearch => {
                self.search_focused = true;
                None
            }
            Action::SearchInput(input) => {
                match input {
                    TextInput::Char(ch) if !ch.is_control() => self.query.push(ch),
                    TextInput::Char(_) => {}
                    TextInput::Backspace => {
                        self.query.pop();
                    }
                }
                None
            }
            Action::SubmitSearch => {
                self.search_focused = false;
                let command = Refresh::for_query(&self.query).into();
                Some(self.dispatch(command))
            }
            Action::ClearSearch => {
                self.search_focused = false;
                self.query.clear();
                Some(self.dispatch(Command::Load))
            }
            Action::MoveSelection(offset) => {
                self.move_selection(offset);
                None
            }
            Action::OpenAdd => {
                self.prompt = None;
                self.modal = Some(Modal {
                    form: DepartmentForm::blank(),
                    editing: false,
                });
                None
            }
            Action::OpenEdit => {
                match self.selected().cloned() {
                    Some(department) => {
                        self.prompt = None;
                        self.modal = Some(Modal {
                            form: DepartmentForm::from_department(&department),
                            editing: true,
                        });
                    }
                    None => self.notice = Some("No department selected to edit.".to_string()),
                }
                None
            }
            Action::FormInput(input) => {
                if self.prompt.is_none() {
                    if let Some(modal) = self.modal.as_mut() {
                        match input {
                            TextInput::Char(' ') if modal.form.focused() == FormField::Active => {
                                modal.form.toggle_active();
                            }
                            TextInput::Char(ch) => {
                                modal.form.push_char(ch);
                            }
                            TextInput::Backspace => modal.form.backspace(),
                        }
                    }
                }
                None
            }
            Action::NextField => {
                if let Some(modal) = self.modal.as_mut() {
                    modal.form.next_field();
                }
                None
            }
            Action::PreviousField => {
                if let Some(modal) = self.modal.as_mut() {
                    modal.form.previous_field();
                }
                None
            }
            Action::ToggleActive => {
                if let Some(modal) = self.modal.as_mut() {
                    modal.form.toggle_active();
                }
                None
            }
            Action::Cancel => {
                if self.prompt.is_none() {
                    self.modal = None;
                }
                None
            }
            Action::Save => self.save(),
            Action::DismissPrompt => {
                self.prompt = None;
                None
            }
            Action::RequestDelete => {
                match self.selected().cloned() {
                    Some(department) if department.id.is_some() => {
                        self.confirm_delete = Some(department);
                    }
                    _ => self.notice = Some("No department selected to delete.".to_string()),
                }
                None
            }
            Action::ConfirmDelete => {
                if self.is_pending(Operation::Delete) {
                    return None;
                }
                let id = self.confirm_delete.take().and_then(|department| department.id)?;
                let refresh = Refresh::for_query(&self.query);
                Some(self.dispatch(Command::Delete { id, refresh }))
            }
            Action::DeclineDelete => {
                self.confirm_delete = None;
                None
            }
            Action::OpenRoster => {
                let department = self.selected().cloned()?;
                Some(self.dispatch(Command::Roster(department)))
            }
            Action::CloseRoster => {
                self.roster = None;
                None
            }
            Action::Completed(completion) => {
                self.complete(completion);
                None
            }
        }
    }

    fn save(&mut self) -> Option<Request> {
        if self.prompt.is_some() || self.is_pending(Operation::Save) {
            return None;
        }
        let modal = self.modal.as_ref()?;
        let department = match modal.form.to_department() {
            Ok(department) => department,
            Err(err) => {
                self.prompt = Some(err.to_string());
                return None;
            }
        };

        let refresh = Refresh::for_query(&self.query);
        let command = if modal.editing {
            Command::Update {
                department,
                refresh,
            }
        } else {
            Command::Create {
                department,
                refresh,
            }
        };
        Some(self.dispatch(command))
    }

    fn is_pending(&self, operation: Operation) -> bool {
        self.pending.is_some_and(|(_, pending)| pending == operation)
    }

    fn dispatch(&mut self, command: Command) -> Request {
        self.last_issued += 1;
        let id = self.last_issued;
        let operation = command.operation();
        self.pending = Some((id, operation));
        self.error = None;
        self.notice = None;
        tracing::debug!(request = id, ?operation, "dispatching request");
        Request { id, command }
    }

    fn complete(&mut self, completion: Completion) {
        if completion.request != self.last_issued {
            tracing::debug!(
                request = completion.request,
                latest = self.last_issued,
                "dropping stale completion"
            );
            return;
        }
        self.pending = None;

        match completion.outcome {
            Outcome::Failed => {
                self.error = Some(completion.operation.failure_message());
            }
            Outcome::Departments(departments) => self.replace_departments(departments),
            Outcome::Written {
                departments,
                refresh,
            } => {
                match completion.operation {
                    Operation::Save => {
                        self.modal = None;
                        self.prompt = None;
                        self.notice = Some("Department saved.".to_string());
                    }
                    Operation::Delete => {
                        self.notice = Some("Department deleted.".to_string());
                    }
                    _ => {}
                }
                match departments {
                    Some(departments) => self.replace_departments(departments),
                    // The write stands; only the list on screen is stale.
                    None => self.error = Some(refresh.failure_message()),
                }
            }
            Outcome::Roster {
                department,
                students,
            } => {
                self.roster = Some(Roster {
                    department,
                    students,
                });
            }
        }
    }

    fn replace_departments(&mut self, departments: Vec<Department>) {
        self.departments = departments;
        self.clamp_selection();
    }

    fn move_selection(&mut self, offset: isize) {
        if self.departments.is_empty() {
            return;
        }
        let last = self.departments.len() as isize - 1;
        let target = (self.selected as isize).saturating_add(offset).clamp(0, last);
        self.selected = target as usize;
    }

    fn clamp_selection(&mut self) {
        if self.departments.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.departments.len() {
            self.selected = self.departments.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn department(id: i64, name: &str) -> Department {
        Department {
            id: Some(id),
            ..Department::new(name, "Fall", "2024")
        }
    }

    fn completed(request: &Request, outcome: Outcome) -> Action {
        Action::Completed(Completion {
            request: request.id,
            operation: request.command.operation(),
            outcome,
        })
    }

    fn written(departments: Vec<Department>) -> Outcome {
        Outcome::Written {
            departments: Some(departments),
            refresh: Operation::Load,
        }
    }

    fn loaded(state: &mut ScreenState, departments: Vec<Department>) {
        let request = state.update(Action::Mount).unwrap();
        state.update(completed(&request, Outcome::Departments(departments)));
    }

    fn type_into_form(state: &mut ScreenState, text: &str) {
        for ch in text.chars() {
            state.update(Action::FormInput(TextInput::Char(ch)));
        }
    }

    #[test]
    fn mount_enters_loading_and_clears_error() {
        let mut state = ScreenState::new();
        let first = state.update(Action::Mount).unwrap();
        state.update(completed(&first, Outcome::Failed));
        assert_eq!(state.error(), Some("Could not load departments."));

        let second = state.update(Action::Retry).unwrap();
        assert_eq!(second.command, Command::Load);
        assert!(state.loading());
        assert_eq!(state.error(), None);
        assert_eq!(state.view(), View::Loading);
    }

    #[test]
    fn successful_load_replaces_list() {
        let mut state = ScreenState::new();
        loaded(&mut state, vec![department(1, "CS"), department(2, "Math")]);
        assert!(!state.loading());
        assert_eq!(state.departments().len(), 2);
        assert_eq!(state.view(), View::Content);
    }

    #[test]
    fn failure_keeps_stale_list_but_shows_error_view() {
        let mut state = ScreenState::new();
        loaded(&mut state, vec![department(1, "CS")]);

        state.update(Action::SearchInput(TextInput::Char('x')));
        let search = state.update(Action::SubmitSearch).unwrap();
        assert_eq!(search.command, Command::Search("x".to_string()));
        state.update(completed(&search, Outcome::Failed));

        assert_eq!(state.departments(), &[department(1, "CS")]);
        assert_eq!(state.view(), View::Error("Could not search departments."));
    }

    #[test]
    fn blank_search_submits_a_full_load() {
        let mut state = ScreenState::new();
        state.update(Action::SearchInput(TextInput::Char(' ')));
        let request = state.update(Action::SubmitSearch).unwrap();
        assert_eq!(request.command, Command::Load);
    }

    #[test]
    fn clear_search_resets_query_and_reloads() {
        let mut state = ScreenState::new();
        state.update(Action::FocusSearch);
        for ch in "Sci".chars() {
            state.update(Action::SearchInput(TextInput::Char(ch)));
        }
        state.update(Action::SearchInput(TextInput::Backspace));
        assert_eq!(state.query(), "Sc");

        let request = state.update(Action::ClearSearch).unwrap();
        assert_eq!(request.command, Command::Load);
        assert_eq!(state.query(), "");
        assert!(!state.search_focused());
    }

    #[test]
    fn open_add_seeds_blank_active_draft() {
        let mut state = ScreenState::new();
        assert!(state.update(Action::OpenAdd).is_none());
        let modal = state.modal().unwrap();
        assert!(!modal.editing);
        assert_eq!(modal.form, DepartmentForm::blank());
        assert_eq!(modal.form.id(), None);
        assert!(state.modal_open());
    }

    #[test]
    fn open_edit_copies_selected_department() {
        let mut state = ScreenState::new();
        loaded(&mut state, vec![department(1, "CS"), department(2, "Math")]);
        state.update(Action::MoveSelection(1));
        state.update(Action::OpenEdit);
        assert!(state.editing());
        let form = &state.modal().unwrap().form;
        assert_eq!(form.id(), Some(2));
        assert_eq!(form.value(FormField::Name), "Math");
    }

    #[test]
    fn cancel_discards_draft_without_request() {
        let mut state = ScreenState::new();
        state.update(Action::OpenAdd);
        type_into_form(&mut state, "CS");
        assert!(state.update(Action::Cancel).is_none());
        assert!(state.modal().is_none());
        assert!(!state.loading());
    }

    #[test]
    fn save_with_empty_name_prompts_and_issues_nothing() {
        let mut state = ScreenState::new();
        state.update(Action::OpenAdd);
        state.update(Action::NextField);
        type_into_form(&mut state, "Fall");
        state.update(Action::NextField);
        type_into_form(&mut state, "2024");

        assert!(state.update(Action::Save).is_none());
        assert_eq!(state.prompt(), Some("Name is required."));
        assert!(state.modal_open());
        assert!(!state.loading());

        // The prompt blocks the form until dismissed.
        type_into_form(&mut state, "zzz");
        assert_eq!(state.modal().unwrap().form.value(FormField::Year), "2024");
        state.update(Action::DismissPrompt);
        assert_eq!(state.prompt(), None);
        assert!(state.modal_open());
    }

    #[test]
    fn save_new_department_issues_create_with_refresh() {
        let mut state = ScreenState::new();
        state.update(Action::SearchInput(TextInput::Char('C')));
        state.update(Action::OpenAdd);
        type_into_form(&mut state, "CS");
        state.update(Action::NextField);
        type_into_form(&mut state, "Fall");
        state.update(Action::NextField);
        type_into_form(&mut state, "2024");

        let request = state.update(Action::Save).unwrap();
        let Command::Create {
            department,
            refresh,
        } = &request.command
        else {
            panic!("expected create, got {:?}", request.command);
        };
        assert_eq!(department.name, "CS");
        assert_eq!(department.is_active, Some(true));
        assert_eq!(refresh, &Refresh::Search("C".to_string()));
        assert!(state.modal_open());

        let saved = department_with_id(department, 1);
        state.update(completed(&request, written(vec![saved])));
        assert!(state.modal().is_none());
        assert_eq!(state.notice(), Some("Department saved."));
    }

    fn department_with_id(department: &Department, id: i64) -> Department {
        Department {
            id: Some(id),
            ..department.clone()
        }
    }

    #[test]
    fn save_in_edit_mode_issues_update() {
        let mut state = ScreenState::new();
        loaded(&mut state, vec![department(4, "CS")]);
        state.update(Action::OpenEdit);
        state.update(Action::ToggleActive);
        let request = state.update(Action::Save).unwrap();
        match request.command {
            Command::Update { department, .. } => {
                assert_eq!(department.id, Some(4));
                assert_eq!(department.is_active, Some(true));
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn failed_save_keeps_modal_and_sets_error() {
        let mut state = ScreenState::new();
        loaded(&mut state, vec![department(4, "CS")]);
        state.update(Action::OpenEdit);
        let request = state.update(Action::Save).unwrap();
        state.update(completed(&request, Outcome::Failed));
        assert!(state.modal_open());
        assert_eq!(state.error(), Some("Could not save the department."));
        assert_eq!(state.departments().len(), 1);
    }

    #[test]
    fn second_save_while_saving_is_ignored() {
        let mut state = ScreenState::new();
        state.update(Action::OpenAdd);
        type_into_form(&mut state, "CS");
        state.update(Action::NextField);
        type_into_form(&mut state, "Fall");
        state.update(Action::NextField);
        type_into_form(&mut state, "2024");

        let first = state.update(Action::Save).unwrap();
        assert!(state.update(Action::Save).is_none());
        assert_eq!(state.pending_request(), Some(first.id));

        state.update(completed(&first, written(vec![department(1, "CS")])));
        assert!(state.modal().is_none());
        assert_eq!(state.departments().len(), 1);
    }

    #[test]
    fn committed_write_with_failed_refresh_closes_modal() {
        let mut state = ScreenState::new();
        loaded(&mut state, vec![department(4, "CS")]);
        state.update(Action::OpenEdit);
        let request = state.update(Action::Save).unwrap();
        state.update(completed(
            &request,
            Outcome::Written {
                departments: None,
                refresh: Operation::Search,
            },
        ));

        assert!(state.modal().is_none());
        assert_eq!(state.notice(), Some("Department saved."));
        assert_eq!(state.view(), View::Error("Could not search departments."));
        assert_eq!(state.departments(), &[department(4, "CS")]);
        // No draft is left to save a second time.
        assert!(state.update(Action::Save).is_none());
    }

    #[test]
    fn retry_reruns_active_search() {
        let mut state = ScreenState::new();
        for ch in "Sci".chars() {
            state.update(Action::SearchInput(TextInput::Char(ch)));
        }
        let search = state.update(Action::SubmitSearch).unwrap();
        state.update(completed(&search, Outcome::Failed));
        assert_eq!(state.view(), View::Error("Could not search departments."));

        let retry = state.update(Action::Retry).unwrap();
        assert_eq!(retry.command, Command::Search("Sci".to_string()));
        assert_eq!(state.query(), "Sci");
    }

    #[test]
    fn confirm_delete_while_deleting_is_ignored() {
        let mut state = ScreenState::new();
        loaded(&mut state, vec![department(3, "CS"), department(4, "Math")]);
        state.update(Action::RequestDelete);
        let first = state.update(Action::ConfirmDelete).unwrap();

        state.update(Action::MoveSelection(1));
        state.update(Action::RequestDelete);
        assert!(state.update(Action::ConfirmDelete).is_none());
        assert_eq!(state.pending_request(), Some(first.id));
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut state = ScreenState::new();
        loaded(&mut state, vec![department(3, "CS")]);

        assert!(state.update(Action::RequestDelete).is_none());
        assert_eq!(state.confirm_delete().and_then(|d| d.id), Some(3));

        assert!(state.update(Action::DeclineDelete).is_none());
        assert!(state.confirm_delete().is_none());
        assert_eq!(state.departments().len(), 1);

        state.update(Action::RequestDelete);
        let request = state.update(Action::ConfirmDelete).unwrap();
        assert_eq!(
            request.command,
            Command::Delete {
                id: 3,
                refresh: Refresh::All
            }
        );
        state.update(completed(&request, written(Vec::new())));
        assert!(state.departments().is_empty());
        assert_eq!(state.notice(), Some("Department deleted."));
    }

    #[test]
    fn confirm_without_pending_delete_is_a_no_op() {
        let mut state = ScreenState::new();
        assert!(state.update(Action::ConfirmDelete).is_none());
        assert!(!state.loading());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut state = ScreenState::new();
        let search = state.update(Action::SubmitSearch).unwrap();
        let reload = state.update(Action::ClearSearch).unwrap();
        assert!(reload.id > search.id);

        let fresh = vec![department(1, "Fresh")];
        let stale = vec![department(9, "Stale")];
        state.update(completed(&reload, Outcome::Departments(fresh)));
        state.update(completed(&search, Outcome::Departments(stale)));
        assert_eq!(state.departments(), &[department(1, "Fresh")]);
        assert!(!state.loading());
    }

    #[test]
    fn older_completion_does_not_end_loading() {
        let mut state = ScreenState::new();
        let first = state.update(Action::Mount).unwrap();
        let second = state.update(Action::Retry).unwrap();
        state.update(completed(&first, Outcome::Failed));
        assert!(state.loading());
        assert_eq!(state.error(), None);
        assert_eq!(state.pending_request(), Some(second.id));
    }

    #[test]
    fn roster_completion_opens_overlay() {
        let mut state = ScreenState::new();
        loaded(&mut state, vec![department(5, "CS")]);
        let request = state.update(Action::OpenRoster).unwrap();
        let students = vec![Student {
            id: 1,
            name: "Ada".to_string(),
            email: None,
        }];
        state.update(completed(
            &request,
            Outcome::Roster {
                department: department(5, "CS"),
                students: students.clone(),
            },
        ));
        assert_eq!(state.roster().unwrap().students, students);
        state.update(Action::CloseRoster);
        assert!(state.roster().is_none());
    }

    #[test]
    fn selection_is_clamped_after_shrinking_list() {
        let mut state = ScreenState::new();
        let departments = vec![department(1, "A"), department(2, "B"), department(3, "C")];
        loaded(&mut state, departments);
        state.update(Action::MoveSelection(10));
        assert_eq!(state.selected_index(), 2);
        loaded(&mut state, vec![department(1, "A")]);
        assert_eq!(state.selected_index(), 0);
        state.update(Action::MoveSelection(-5));
        assert_eq!(state.selected_index(), 0);
    }

    #[test]
    fn roster_without_selection_keeps_error_view() {
        let mut state = ScreenState::new();
        let request = state.update(Action::Mount).unwrap();
        state.update(completed(&request, Outcome::Failed));
        state.update(Action::OpenRoster);
        // No selection, so nothing was dispatched and the error stays visible.
        assert_eq!(state.view(), View::Error("Could not load departments."));
    }
}
