//! Sequential dispatch of personalized messages to selected contacts.
//!
//! One contact at a time, in table order. A failed send is recorded and the
//! loop moves on; nothing is retried.
//!
//! CHANGELOG:
//! - 10/19/2026 - Structured report with timestamps
//! - 10/12/2026 - Initial implementation

use crate::compose;
use crate::contacts::selection::SelectedContact;
use crate::notice::Notice;
use crate::phone;
use crate::sender::{MessageSender, SendTiming};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

pub const EMPTY_SELECTION_WARNING: &str = "No contacts selected. Select rows in the table first.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    Sent,
    Failed,
}

/// What happened for one selected contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendOutcome {
    pub row: usize,
    pub id: String,
    pub name: String,
    pub phone: String,
    pub status: SendStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub outcomes: Vec<SendOutcome>,
    pub sent: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }
}

/// Report plus the notices to show the user.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub report: DispatchReport,
    pub notices: Vec<Notice>,
}

/// Send `template`, personalized per contact, to every selected contact.
pub fn dispatch<S>(
    selected: &[SelectedContact],
    template: &str,
    sender: &mut S,
    timing: &SendTiming,
) -> Dispatched
where
    S: MessageSender + ?Sized,
{
    let started_at = Utc::now();

    if selected.is_empty() {
        warn!("send requested with an empty selection");
        return Dispatched {
            report: DispatchReport {
                outcomes: Vec::new(),
                sent: 0,
                failed: 0,
                started_at,
                finished_at: Utc::now(),
            },
            notices: vec![Notice::warning(EMPTY_SELECTION_WARNING)],
        };
    }

    let mut outcomes = Vec::with_capacity(selected.len());
    let mut notices = Vec::with_capacity(selected.len());

    for SelectedContact { row, contact } in selected {
        let phone = phone::normalize(&contact.phone);
        let body = compose::compose(template, contact);

        let outcome = match sender.send(&phone, &body, timing) {
            Ok(()) => {
                info!(row, phone = %phone, "message sent");
                notices.push(Notice::success(format!(
                    "Message sent to {} ({})",
                    contact.name, phone
                )));
                SendOutcome {
                    row: *row,
                    id: contact.id.clone(),
                    name: contact.name.clone(),
                    phone,
                    status: SendStatus::Sent,
                    error: None,
                }
            }
            Err(e) => {
                warn!(row, phone = %phone, error = %e, "message failed");
                notices.push(Notice::error(format!(
                    "Failed to send message to {} ({}): {}",
                    contact.name, phone, e
                )));
                SendOutcome {
                    row: *row,
                    id: contact.id.clone(),
                    name: contact.name.clone(),
                    phone,
                    status: SendStatus::Failed,
                    error: Some(e.to_string()),
                }
            }
        };
        outcomes.push(outcome);
    }

    let sent = outcomes
        .iter()
        .filter(|o| o.status == SendStatus::Sent)
        .count();
    let failed = outcomes.len() - sent;

    Dispatched {
        report: DispatchReport {
            outcomes,
            sent,
            failed,
            started_at,
            finished_at: Utc::now(),
        },
        notices,
    }
}
