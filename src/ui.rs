//! Ratatui front-end for the department screen. `state` holds the screen's
//! finite-state object and reducer, `worker` runs store requests off the UI
//! thread, and `app` maps keys to actions and renders the result.

mod app;
mod forms;
mod helpers;
mod state;
mod terminal;
mod worker;

pub use app::App;
pub use forms::{DepartmentForm, FormError, FormField};
pub use state::{
    Action, Command, Completion, Modal, Operation, Outcome, Refresh, Request, RequestId, Roster,
    ScreenState, TextInput, View,
};
pub use terminal::run_app;
pub use worker::{execute, Worker};
