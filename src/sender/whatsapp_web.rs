//! WhatsApp Web sender driven through the desktop browser.
//!
//! Opens a `web.whatsapp.com/send` deep link with the message prefilled,
//! waits for the page to load, presses Enter and optionally closes the tab.

use super::desktop::{Desktop, SystemDesktop};
use super::{MessageSender, SendError, SendTiming};
use crate::phone;
use tracing::debug;

const WHATSAPP_WEB_SEND_URL: &str = "https://web.whatsapp.com/send";

/// Build the deep link that opens a chat with `body` typed into the composer.
pub fn send_url(phone: &str, body: &str) -> String {
    format!(
        "{}?phone={}&text={}",
        WHATSAPP_WEB_SEND_URL,
        urlencoding::encode(phone),
        urlencoding::encode(body)
    )
}

pub struct WhatsAppWebSender<D: Desktop = SystemDesktop> {
    desktop: D,
}

impl WhatsAppWebSender<SystemDesktop> {
    pub fn new() -> Self {
        Self {
            desktop: SystemDesktop,
        }
    }
}

impl Default for WhatsAppWebSender<SystemDesktop> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Desktop> WhatsAppWebSender<D> {
    pub fn with_desktop(desktop: D) -> Self {
        Self { desktop }
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }
}

impl<D: Desktop> MessageSender for WhatsAppWebSender<D> {
    fn send(&mut self, phone: &str, body: &str, timing: &SendTiming) -> Result<(), SendError> {
        if !phone::has_country_code(phone) {
            return Err(SendError::MissingCountryCode(phone.to_string()));
        }

        let url = send_url(phone, body);
        debug!(phone, "opening whatsapp web");
        self.desktop.open_url(&url)?;

        self.desktop.pause(timing.wait_time);
        self.desktop.press_enter()?;

        if timing.tab_close {
            self.desktop.pause(timing.close_time);
            self.desktop.close_tab()?;
        }

        Ok(())
    }
}
