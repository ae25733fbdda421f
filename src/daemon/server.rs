//! UNIX socket server for daemon mode.
//!
//! Listens on a UNIX socket, accepts connections one at a time, and
//! dispatches requests to [`DaemonService`].
//!
//! CHANGELOG:
//! - 10/12/2026 - Initial implementation

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use crate::daemon::protocol::{self, codes};
use crate::daemon::service::DaemonService;

/// Daemon server listening on UNIX socket.
pub struct DaemonServer {
    service: DaemonService,
    socket_path: PathBuf,
}

impl DaemonServer {
    pub fn new(socket_path: impl AsRef<Path>, service: DaemonService) -> Self {
        Self {
            service,
            socket_path: socket_path.as_ref().to_path_buf(),
        }
    }

    /// Bind the socket, replacing a stale one, owner-only permissions.
    pub fn bind(&self) -> Result<UnixListener> {
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)
            .with_context(|| format!("Failed to bind {}", self.socket_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.socket_path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(listener)
    }

    /// Start serving requests (blocking).
    pub fn serve(&self) -> Result<()> {
        let listener = self.bind()?;
        info!(socket = %self.socket_path.display(), "daemon listening");
        self.serve_listener(&listener, None)
    }

    /// Accept connections sequentially; stop after `limit` if given.
    pub fn serve_listener(&self, listener: &UnixListener, limit: Option<usize>) -> Result<()> {
        let mut handled = 0usize;
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(e) = self.handle_connection(stream) {
                        warn!(error = %e, "connection error");
                    }
                }
                Err(e) => warn!(error = %e, "accept error"),
            }

            handled += 1;
            if limit.is_some_and(|limit| handled >= limit) {
                break;
            }
        }
        Ok(())
    }

    /// Handle a single client connection: one request line, one response line.
    fn handle_connection(&self, stream: UnixStream) -> Result<()> {
        let mut writer = stream.try_clone()?;
        let mut reader = BufReader::new(&stream);

        let mut line = String::new();
        reader.read_line(&mut line)?;

        if line.trim().is_empty() {
            return Ok(()); // Client disconnected
        }

        let start = Instant::now();
        let elapsed_ms = |start: Instant| start.elapsed().as_secs_f64() * 1000.0;

        let response = match protocol::Request::from_ndjson_line(&line) {
            Ok(request) => {
                info!(method = %request.method, id = %request.id, "request");
                match self.service.dispatch(&request.method, request.params) {
                    Ok(result) => protocol::Response::success(request.id, result, elapsed_ms(start)),
                    Err(e) => protocol::Response::error(
                        request.id,
                        e.code(),
                        e.to_string(),
                        elapsed_ms(start),
                    ),
                }
            }
            Err(e) => protocol::Response::error(
                String::new(),
                codes::INVALID_JSON,
                format!("{:#}", e),
                elapsed_ms(start),
            ),
        };

        writer.write_all(response.to_ndjson_line()?.as_bytes())?;
        writer.flush()?;

        Ok(())
    }
}
