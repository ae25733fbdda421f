//! UNIX socket client for the session daemon.

use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::daemon::protocol::{Request, Response};
use thiserror::Error;

/// Errors that can occur when talking to the daemon.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Daemon not running (socket not found: {0}). Start it with `wabulk-daemon start`.")]
    SocketNotFound(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerializeError(#[source] serde_json::Error),

    #[error("JSON parse error: {0}")]
    ParseError(#[source] serde_json::Error),

    #[error("Empty response from daemon")]
    EmptyResponse,

    #[error("Timeout waiting for response")]
    Timeout,
}

impl ClientError {
    /// Stable code for `--json` error output.
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::SocketNotFound(_) => "DAEMON_NOT_RUNNING",
            ClientError::ConnectionFailed(_) => "CONNECT_FAILED",
            ClientError::SerializeError(_) => "SERIALIZE_ERROR",
            ClientError::ParseError(_) => "PARSE_ERROR",
            ClientError::EmptyResponse => "EMPTY_RESPONSE",
            ClientError::Timeout => "TIMEOUT",
        }
    }
}

/// A client for the session daemon. One request per connection.
pub struct DaemonClient {
    socket_path: PathBuf,
    timeout: Option<Duration>,
}

impl DaemonClient {
    /// `timeout: None` waits forever (used for sends, which block per contact).
    pub fn new(socket_path: impl AsRef<Path>, timeout: Option<Duration>) -> Self {
        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
            timeout,
        }
    }

    pub fn with_timeout(&self, timeout: Option<Duration>) -> Self {
        Self::new(&self.socket_path, timeout)
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send a request to the daemon and receive a response.
    pub fn call(&self, request: &Request) -> Result<Response, ClientError> {
        if !self.socket_path.exists() {
            return Err(ClientError::SocketNotFound(
                self.socket_path.display().to_string(),
            ));
        }

        let stream = UnixStream::connect(&self.socket_path)?;
        stream.set_read_timeout(self.timeout)?;
        stream.set_write_timeout(self.timeout)?;

        let mut writer = &stream;
        let json = serde_json::to_string(request).map_err(ClientError::SerializeError)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        let mut reader = BufReader::new(&stream);
        let mut line = String::new();
        let bytes_read = reader.read_line(&mut line).map_err(|e| match e.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => ClientError::Timeout,
            _ => ClientError::ConnectionFailed(e),
        })?;

        if bytes_read == 0 {
            return Err(ClientError::EmptyResponse);
        }

        serde_json::from_str(&line).map_err(ClientError::ParseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_socket() {
        let dir = tempfile::tempdir().unwrap();
        let client = DaemonClient::new(dir.path().join("none.sock"), None);
        let err = client.call(&Request::no_params("health")).unwrap_err();

        assert!(matches!(err, ClientError::SocketNotFound(_)));
        assert_eq!(err.code(), "DAEMON_NOT_RUNNING");
    }

    #[test]
    fn test_with_timeout_keeps_socket() {
        let client = DaemonClient::new("/tmp/x.sock", Some(Duration::from_secs(1)));
        let patient = client.with_timeout(None);
        assert_eq!(patient.socket_path(), Path::new("/tmp/x.sock"));
    }
}
