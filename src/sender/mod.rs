//! The external send capability and its implementations.
//!
//! CHANGELOG:
//! - 10/19/2026 - Added DryRunSender
//! - 10/12/2026 - Initial MessageSender trait and WhatsApp Web sender

pub mod desktop;
pub mod dry_run;
pub mod whatsapp_web;

pub use desktop::{Desktop, SystemDesktop};
pub use dry_run::DryRunSender;
pub use whatsapp_web::WhatsAppWebSender;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default seconds to wait for WhatsApp Web to load before pressing send.
pub const DEFAULT_WAIT_SECS: u64 = 15;
/// Default seconds to wait after sending before closing the tab.
pub const DEFAULT_CLOSE_SECS: u64 = 3;

/// Timing handed to the sender for every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTiming {
    pub wait_time: Duration,
    pub tab_close: bool,
    pub close_time: Duration,
}

impl Default for SendTiming {
    fn default() -> Self {
        Self {
            wait_time: Duration::from_secs(DEFAULT_WAIT_SECS),
            tab_close: true,
            close_time: Duration::from_secs(DEFAULT_CLOSE_SECS),
        }
    }
}

/// Why a single send failed. The display string is shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error("Country code missing in phone number '{0}'")]
    MissingCountryCode(String),

    #[error("Could not open browser: {0}")]
    Browser(String),

    #[error("Keyboard automation failed: {0}")]
    Automation(String),

    #[error("Keyboard automation is not supported on {0}")]
    Unsupported(&'static str),

    #[error("{0}")]
    Other(String),
}

/// Anything that can deliver one text message to one phone number.
///
/// Calls block until the message is handed off or the attempt fails.
pub trait MessageSender {
    fn send(&mut self, phone: &str, body: &str, timing: &SendTiming) -> Result<(), SendError>;
}

impl<S: MessageSender + ?Sized> MessageSender for Box<S> {
    fn send(&mut self, phone: &str, body: &str, timing: &SendTiming) -> Result<(), SendError> {
        (**self).send(phone, body, timing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let timing = SendTiming::default();
        assert_eq!(timing.wait_time, Duration::from_secs(15));
        assert!(timing.tab_close);
        assert_eq!(timing.close_time, Duration::from_secs(3));
    }

    #[test]
    fn test_error_details() {
        assert_eq!(
            SendError::MissingCountryCode("12345".into()).to_string(),
            "Country code missing in phone number '12345'"
        );
        assert_eq!(SendError::Other("tab crashed".into()).to_string(), "tab crashed");
    }
}
