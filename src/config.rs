//! Runtime configuration: socket location and send timing.

use crate::sender::SendTiming;
use std::path::PathBuf;
use std::time::Duration;

/// Env var that overrides the daemon socket path.
pub const SOCKET_ENV: &str = "WABULK_SOCKET";

/// Default daemon socket path.
///
/// Tries, in order:
/// 1. `WABULK_SOCKET` env var (`~` expanded)
/// 2. `~/.wabulk/daemon.sock`
/// 3. `./.wabulk/daemon.sock` when there is no home directory
pub fn default_socket_path() -> PathBuf {
    if let Ok(path) = std::env::var(SOCKET_ENV) {
        if !path.trim().is_empty() {
            return expand(&path);
        }
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wabulk")
        .join("daemon.sock")
}

/// Resolve a user-supplied socket path, falling back to the default.
pub fn resolve_socket_path(arg: Option<&str>) -> PathBuf {
    match arg {
        Some(path) => expand(path),
        None => default_socket_path(),
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Pid file kept next to the socket by a background daemon.
pub fn pid_file_for(socket: &std::path::Path) -> PathBuf {
    let mut name = socket.as_os_str().to_os_string();
    name.push(".pid");
    PathBuf::from(name)
}

/// Build send timing from CLI flag values (seconds).
pub fn send_timing(wait_secs: u64, close_secs: u64, no_tab_close: bool) -> SendTiming {
    SendTiming {
        wait_time: Duration::from_secs(wait_secs),
        tab_close: !no_tab_close,
        close_time: Duration::from_secs(close_secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_explicit_socket_path() {
        assert_eq!(
            resolve_socket_path(Some("/tmp/wabulk.sock")),
            PathBuf::from("/tmp/wabulk.sock")
        );
    }

    #[test]
    fn test_default_socket_file_name() {
        let path = resolve_socket_path(None);
        assert!(path.ends_with("daemon.sock") || std::env::var(SOCKET_ENV).is_ok());
    }

    #[test]
    fn test_pid_file() {
        assert_eq!(
            pid_file_for(Path::new("/tmp/daemon.sock")),
            PathBuf::from("/tmp/daemon.sock.pid")
        );
    }

    #[test]
    fn test_send_timing_defaults_match() {
        assert_eq!(send_timing(15, 3, false), SendTiming::default());
        assert!(!send_timing(15, 3, true).tab_close);
    }
}
