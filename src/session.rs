//! Session state and the actions that move it forward.
//!
//! [`AppState`] is a plain value: every action takes the current state and
//! returns the next one together with the notices to show. Nothing here is
//! global.
//!
//! CHANGELOG:
//! - 10/19/2026 - Added ReplaceTable and DeleteRow
//! - 10/12/2026 - Initial implementation

use crate::contacts::{Contact, ContactStore, Selection};
use crate::dispatch::{self, DispatchReport};
use crate::import;
use crate::notice::Notice;
use crate::sender::{MessageSender, SendTiming};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Visibility of the add-entry form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormVisibility {
    #[default]
    Hidden,
    Visible,
}

/// Everything one session knows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub table: ContactStore,
    pub add_form: FormVisibility,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A user action against the session.
#[derive(Debug, Clone)]
pub enum Action {
    /// Upload a spreadsheet file
    Import { path: PathBuf },
    /// Upload an already-read grid (header row first)
    ImportRows { rows: Vec<Vec<String>> },
    OpenAddForm,
    CancelAddForm,
    SubmitAdd {
        id: String,
        name: String,
        phone: String,
    },
    DeleteRow { row: usize },
    /// Edited table snapshot from a client
    ReplaceTable { contacts: Vec<Contact> },
    Send {
        selection: Selection,
        template: String,
    },
    DeleteAll,
}

/// Result of one action.
#[derive(Debug)]
pub struct Outcome {
    pub state: AppState,
    pub notices: Vec<Notice>,
    pub report: Option<DispatchReport>,
}

impl Outcome {
    fn new(state: AppState, notice: Notice) -> Self {
        Self {
            state,
            notices: vec![notice],
            report: None,
        }
    }
}

/// Apply `action` to `state`.
///
/// Only `Send` touches the sender; it blocks until every selected contact
/// has been attempted.
pub fn apply<S>(mut state: AppState, action: Action, sender: &mut S, timing: &SendTiming) -> Outcome
where
    S: MessageSender + ?Sized,
{
    match action {
        Action::Import { path } => {
            let imported = import::import_file(&path);
            finish_import(state, imported)
        }
        Action::ImportRows { rows } => {
            let imported = import::contacts_from_rows(&rows);
            finish_import(state, imported)
        }
        Action::OpenAddForm => {
            state.add_form = FormVisibility::Visible;
            Outcome {
                state,
                notices: Vec::new(),
                report: None,
            }
        }
        Action::CancelAddForm => {
            state.add_form = FormVisibility::Hidden;
            Outcome {
                state,
                notices: Vec::new(),
                report: None,
            }
        }
        Action::SubmitAdd { id, name, phone } => {
            let added = state.table.add(&id, &name, &phone);
            let notice = Notice::success(format!("Entry added: {} ({})", added.name, added.phone));
            info!(rows = state.table.len(), "entry added");
            state.add_form = FormVisibility::Hidden;
            Outcome::new(state, notice)
        }
        Action::DeleteRow { row } => match state.table.remove(row) {
            Ok(removed) => {
                let notice = Notice::success(format!("Row {} deleted: {}", row, removed.name));
                Outcome::new(state, notice)
            }
            Err(e) => Outcome::new(state, Notice::error(e.to_string())),
        },
        Action::ReplaceTable { contacts } => {
            let count = contacts.len();
            state.table.replace(contacts);
            Outcome::new(state, Notice::success(format!("Table updated ({} rows)", count)))
        }
        Action::Send { selection, template } => {
            let selected = match selection.resolve(&state.table) {
                Ok(selected) => selected,
                Err(e) => return Outcome::new(state, Notice::error(e.to_string())),
            };
            let dispatched = dispatch::dispatch(&selected, &template, sender, timing);
            Outcome {
                state,
                notices: dispatched.notices,
                report: Some(dispatched.report),
            }
        }
        Action::DeleteAll => {
            state.table.clear();
            info!("all data deleted");
            Outcome::new(state, Notice::success("All data deleted!"))
        }
    }
}

fn finish_import(mut state: AppState, imported: Result<Vec<Contact>, import::ImportError>) -> Outcome {
    match imported {
        Ok(contacts) => {
            let count = contacts.len();
            state.table = ContactStore::from_contacts(contacts);
            info!(rows = count, "table replaced by import");
            Outcome::new(
                state,
                Notice::success(format!("Spreadsheet loaded successfully! ({} contacts)", count)),
            )
        }
        Err(e) => {
            warn!(error = %e, "import rejected");
            Outcome::new(state, Notice::error(e.to_string()))
        }
    }
}
