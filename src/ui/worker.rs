use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;

use crate::db::{
    create_department, delete_department, fetch_departments, fetch_students_for_department,
    search_departments, update_department,
};
use crate::error::DepartmentError;

use super::state::{Command, Completion, Outcome, Refresh, Request};

/// Background thread that owns the SQLite connection and runs requests in
/// the order they were submitted. The UI thread never blocks on the store.
pub struct Worker {
    requests: Option<Sender<Request>>,
    completions: Receiver<Completion>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn spawn(conn: Connection) -> Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<Request>();
        let (completion_tx, completion_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("department-store".to_string())
            .spawn(move || {
                for request in request_rx {
                    if completion_tx.send(execute(&conn, request)).is_err() {
                        break;
                    }
                }
                tracing::debug!("store worker stopped");
            })
            .context("failed to spawn store worker")?;

        Ok(Self {
            requests: Some(request_tx),
            completions: completion_rx,
            handle: Some(handle),
        })
    }

    pub fn submit(&self, request: Request) -> Result<()> {
        self.requests
            .as_ref()
            .ok_or_else(|| anyhow!("store worker has shut down"))?
            .send(request)
            .map_err(|_| anyhow!("store worker has shut down"))
    }

    /// Next finished request, if one is ready.
    pub fn try_completion(&self) -> Option<Completion> {
        self.completions.try_recv().ok()
    }

    /// Block until the next request finishes.
    pub fn wait_completion(&self) -> Result<Completion> {
        self.completions
            .recv()
            .map_err(|_| anyhow!("store worker has shut down"))
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("store worker panicked");
            }
        }
    }
}

/// Run one request against the store. Failures have already been logged by
/// the repository; here they collapse into `Outcome::Failed`.
pub fn execute(conn: &Connection, request: Request) -> Completion {
    let operation = request.command.operation();
    let outcome = run(conn, request.command).unwrap_or_else(|err| {
        tracing::warn!(request = request.id, ?operation, "request failed: {err:#}");
        Outcome::Failed
    });

    Completion {
        request: request.id,
        operation,
        outcome,
    }
}

fn run(conn: &Connection, command: Command) -> Result<Outcome> {
    match command {
        Command::Load => Ok(Outcome::Departments(fetch_departments(conn)?)),
        Command::Search(query) => Ok(Outcome::Departments(search_departments(conn, &query)?)),
        Command::Create {
            department,
            refresh,
        } => {
            create_department(conn, &department)?;
            Ok(refreshed(conn, &refresh))
        }
        Command::Update {
            department,
            refresh,
        } => {
            if !update_department(conn, &department)? {
                tracing::warn!(id = ?department.id, "update matched no department");
            }
            Ok(refreshed(conn, &refresh))
        }
        Command::Delete { id, refresh } => {
            if !delete_department(conn, id)? {
                tracing::warn!(id, "delete matched no department");
            }
            Ok(refreshed(conn, &refresh))
        }
        Command::Roster(department) => {
            let id = department.id.ok_or(DepartmentError::MissingId)?;
            let students = fetch_students_for_department(conn, id)?;
            Ok(Outcome::Roster {
                department,
                students,
            })
        }
    }
}

/// Re-query the list after a committed write. A failure here is reported
/// on its own so the write is not mistaken for a failed one.
fn refreshed(conn: &Connection, refresh: &Refresh) -> Outcome {
    let result = match refresh {
        Refresh::All => fetch_departments(conn),
        Refresh::Search(query) => search_departments(conn, query),
    };
    let departments = result
        .inspect_err(|err| tracing::warn!("refresh after write failed: {err:#}"))
        .ok();
    Outcome::Written {
        departments,
        refresh: refresh.operation(),
    }
}
