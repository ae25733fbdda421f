//! Desktop automation: opening URLs and sending keystrokes to the browser.
//!
//! macOS goes through osascript (System Events), other unix desktops through
//! xdotool.
//!
//! CHANGELOG:
//! - 10/12/2026 - Initial implementation

use super::SendError;
use std::process::Command;
use std::time::Duration;

/// The side effects a browser-driven sender needs.
pub trait Desktop {
    fn open_url(&mut self, url: &str) -> Result<(), SendError>;
    fn pause(&mut self, duration: Duration);
    fn press_enter(&mut self) -> Result<(), SendError>;
    fn close_tab(&mut self) -> Result<(), SendError>;
}

const ENTER_KEY: &str = "key code 36";
const CLOSE_TAB_KEY: &str = r#"keystroke "w" using command down"#;

/// AppleScript that types `keystroke` into the frontmost app.
fn keystroke_script(keystroke: &str) -> String {
    format!(
        r#"tell application "System Events" to {}"#,
        keystroke
    )
}

/// The real desktop.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDesktop;

impl SystemDesktop {
    fn run(program: &str, args: &[&str]) -> Result<(), SendError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| SendError::Automation(format!("{}: {}", program, e)))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(SendError::Automation(format!(
                "{} failed: {}",
                program,
                stderr.trim()
            )))
        }
    }

    fn osascript(script: &str) -> Result<(), SendError> {
        Self::run("osascript", &["-e", script])
    }
}

impl Desktop for SystemDesktop {
    fn open_url(&mut self, url: &str) -> Result<(), SendError> {
        open::that(url).map_err(|e| SendError::Browser(e.to_string()))
    }

    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn press_enter(&mut self) -> Result<(), SendError> {
        if cfg!(target_os = "macos") {
            Self::osascript(&keystroke_script(ENTER_KEY))
        } else if cfg!(unix) {
            Self::run("xdotool", &["key", "Return"])
        } else {
            Err(SendError::Unsupported(std::env::consts::OS))
        }
    }

    fn close_tab(&mut self) -> Result<(), SendError> {
        if cfg!(target_os = "macos") {
            Self::osascript(&keystroke_script(CLOSE_TAB_KEY))
        } else if cfg!(unix) {
            Self::run("xdotool", &["key", "ctrl+w"])
        } else {
            Err(SendError::Unsupported(std::env::consts::OS))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keystroke_script() {
        assert_eq!(
            keystroke_script(ENTER_KEY),
            r#"tell application "System Events" to key code 36"#
        );
        assert_eq!(
            keystroke_script(CLOSE_TAB_KEY),
            r#"tell application "System Events" to keystroke "w" using command down"#
        );
    }

    #[test]
    fn test_missing_program_is_automation_error() {
        let err = SystemDesktop::run("wabulk-definitely-not-a-program", &[]).unwrap_err();
        assert!(matches!(err, SendError::Automation(_)));
    }
}
