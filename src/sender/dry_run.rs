//! Sender that only records what it would have sent.

use super::{MessageSender, SendError, SendTiming};
use serde::Serialize;
use tracing::info;

/// One message a dry run would have delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrySend {
    pub phone: String,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct DryRunSender {
    sent: Vec<DrySend>,
}

impl DryRunSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[DrySend] {
        &self.sent
    }
}

impl MessageSender for DryRunSender {
    fn send(&mut self, phone: &str, body: &str, _timing: &SendTiming) -> Result<(), SendError> {
        info!(phone, chars = body.chars().count(), "dry run: message not sent");
        self.sent.push(DrySend {
            phone: phone.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
