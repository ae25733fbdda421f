//! Daemon service - maps protocol methods onto session actions.
//!
//! Owns the single session. Requests are handled one at a time on the
//! server thread, so plain `RefCell`s are enough.
//!
//! CHANGELOG:
//! - 10/19/2026 - preview and replace_table methods
//! - 10/12/2026 - Initial implementation

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::compose;
use crate::contacts::{Contact, Selection};
use crate::daemon::protocol::codes;
use crate::notice::Notice;
use crate::session::{self, Action, AppState, Outcome};
use crate::sender::{MessageSender, SendTiming};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Missing parameter '{0}'")]
    MissingParam(&'static str),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParam { name: &'static str, reason: String },
}

impl ServiceError {
    /// Protocol error code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::UnknownMethod(_) => codes::UNKNOWN_METHOD,
            ServiceError::MissingParam(_) | ServiceError::InvalidParam { .. } => {
                codes::INVALID_PARAMS
            }
        }
    }
}

type Params = HashMap<String, Value>;

/// Daemon service holding the session.
pub struct DaemonService {
    state: RefCell<AppState>,
    sender: RefCell<Box<dyn MessageSender>>,
    timing: SendTiming,
    dry_run: bool,
    started_at: String,
}

impl DaemonService {
    pub fn new(sender: Box<dyn MessageSender>, timing: SendTiming, dry_run: bool) -> Self {
        Self {
            state: RefCell::new(AppState::new()),
            sender: RefCell::new(sender),
            timing,
            dry_run,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Dispatch request to appropriate handler.
    pub fn dispatch(&self, method: &str, params: Params) -> Result<Value, ServiceError> {
        debug!(method, "dispatching");
        match method {
            "health" => Ok(self.health()),
            "list" => Ok(self.snapshot(&[])),
            "import" => {
                let path: String = required(&params, "path")?;
                Ok(self.run(Action::Import {
                    path: PathBuf::from(shellexpand::tilde(&path).into_owned()),
                }))
            }
            "open_form" => Ok(self.run(Action::OpenAddForm)),
            "cancel_form" => Ok(self.run(Action::CancelAddForm)),
            "add" => Ok(self.run(Action::SubmitAdd {
                id: text_param(&params, "id")?,
                name: text_param(&params, "name")?,
                phone: text_param(&params, "phone")?,
            })),
            "delete_row" => {
                let row: usize = required(&params, "row")?;
                Ok(self.run(Action::DeleteRow { row }))
            }
            "replace_table" => {
                let contacts: Vec<Contact> = required(&params, "contacts")?;
                Ok(self.run(Action::ReplaceTable { contacts }))
            }
            "preview" => self.preview(&params),
            "send" => {
                let template: String = required(&params, "template")?;
                let selection: Selection = required(&params, "selection")?;
                let warnings = placeholder_warnings(&template);
                let mut result = self.run(Action::Send {
                    selection,
                    template,
                });
                prepend_notices(&mut result, warnings);
                Ok(result)
            }
            "delete_all" => Ok(self.run(Action::DeleteAll)),
            _ => Err(ServiceError::UnknownMethod(method.to_string())),
        }
    }

    fn health(&self) -> Value {
        json!({
            "pid": std::process::id(),
            "started_at": self.started_at,
            "version": "v1",
            "dry_run": self.dry_run,
            "contacts_loaded": self.state.borrow().table.len(),
        })
    }

    /// Run one action through the session reducer and store the new state.
    fn run(&self, action: Action) -> Value {
        let state = self.state.take();
        let Outcome {
            state,
            notices,
            report,
        } = {
            let mut sender = self.sender.borrow_mut();
            session::apply(state, action, &mut *sender, &self.timing)
        };
        *self.state.borrow_mut() = state;

        let mut result = self.snapshot(&notices);
        if let Some(report) = report {
            result["report"] = serde_json::to_value(report).unwrap_or(Value::Null);
        }
        result
    }

    fn preview(&self, params: &Params) -> Result<Value, ServiceError> {
        let template: String = required(params, "template")?;
        let selection: Selection = optional(params, "selection")?.unwrap_or(Selection::All);

        let state = self.state.borrow();
        let mut notices = placeholder_warnings(&template);
        let messages = match selection.resolve(&state.table) {
            Ok(selected) => compose::preview(&selected, &template),
            Err(e) => {
                notices.push(Notice::error(e.to_string()));
                Vec::new()
            }
        };

        Ok(json!({
            "messages": messages,
            "notices": notices,
        }))
    }

    /// Current table and form state plus the given notices.
    fn snapshot(&self, notices: &[Notice]) -> Value {
        let state = self.state.borrow();
        json!({
            "notices": notices,
            "table": state.table,
            "add_form": state.add_form,
        })
    }
}

fn placeholder_warnings(template: &str) -> Vec<Notice> {
    let unknown = compose::unresolved_placeholders(template);
    if unknown.is_empty() {
        return Vec::new();
    }
    vec![Notice::warning(format!(
        "Template placeholders left as-is: {}",
        unknown.join(", ")
    ))]
}

fn prepend_notices(result: &mut Value, extra: Vec<Notice>) {
    if extra.is_empty() {
        return;
    }
    if let Some(list) = result.get_mut("notices").and_then(Value::as_array_mut) {
        let mut merged: Vec<Value> = extra
            .into_iter()
            .filter_map(|n| serde_json::to_value(n).ok())
            .collect();
        merged.append(list);
        *list = merged;
    }
}

fn optional<T: DeserializeOwned>(params: &Params, name: &'static str) -> Result<Option<T>, ServiceError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| ServiceError::InvalidParam {
                name,
                reason: e.to_string(),
            }),
    }
}

fn required<T: DeserializeOwned>(params: &Params, name: &'static str) -> Result<T, ServiceError> {
    optional(params, name)?.ok_or(ServiceError::MissingParam(name))
}

/// Form fields arrive as strings, but spreadsheet-minded clients send numbers.
fn text_param(params: &Params, name: &'static str) -> Result<String, ServiceError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(ServiceError::InvalidParam {
            name,
            reason: format!("expected text, got {}", other),
        }),
    }
}
