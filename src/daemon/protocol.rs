//! Daemon protocol types for NDJSON communication over a UNIX socket.
//!
//! One request line in, one response line out, per connection.
//!
//! CHANGELOG:
//! - 10/12/2026 - Initial implementation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub const PROTOCOL_VERSION: u8 = 1;

/// Error codes carried in [`ErrorInfo::code`].
pub mod codes {
    pub const INVALID_JSON: &str = "INVALID_JSON";
    pub const UNKNOWN_METHOD: &str = "UNKNOWN_METHOD";
    pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
    pub const ERROR: &str = "ERROR";
}

/// NDJSON request from client to daemon.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    /// Unique request ID (UUID)
    pub id: String,
    /// Protocol version (currently 1)
    pub v: u8,
    /// Method name (e.g., "health", "import", "send")
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: HashMap<String, Value>,
}

/// NDJSON response from daemon to client.
#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    /// Request ID (matches request)
    pub id: String,
    /// Success flag
    pub ok: bool,
    /// Result data (if successful)
    pub result: Option<Value>,
    /// Error information (if failed)
    pub error: Option<ErrorInfo>,
    /// Response metadata
    pub meta: ResponseMeta,
}

/// Error details in response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code (see [`codes`])
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details (optional)
    pub details: Option<Value>,
}

/// Response metadata.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Server execution time in milliseconds
    pub server_ms: f64,
    /// Protocol version
    pub protocol_v: u8,
}

impl Request {
    /// Build a request with a fresh id.
    pub fn new(method: impl Into<String>, params: HashMap<String, Value>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            v: PROTOCOL_VERSION,
            method: method.into(),
            params,
        }
    }

    pub fn no_params(method: impl Into<String>) -> Self {
        Self::new(method, HashMap::new())
    }

    /// Parse request from NDJSON line.
    pub fn from_ndjson_line(line: &str) -> Result<Self> {
        serde_json::from_str(line.trim_end()).context("Failed to parse request JSON")
    }

    /// Serialize request to NDJSON line.
    pub fn to_ndjson_line(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

impl Response {
    /// Create a success response.
    pub fn success(id: String, result: Value, server_ms: f64) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
            meta: ResponseMeta {
                server_ms,
                protocol_v: PROTOCOL_VERSION,
            },
        }
    }

    /// Create an error response.
    pub fn error(id: String, code: &str, message: String, server_ms: f64) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(ErrorInfo {
                code: code.to_string(),
                message,
                details: None,
            }),
            meta: ResponseMeta {
                server_ms,
                protocol_v: PROTOCOL_VERSION,
            },
        }
    }

    /// Parse response from NDJSON line.
    pub fn from_ndjson_line(line: &str) -> Result<Self> {
        serde_json::from_str(line.trim_end()).context("Failed to parse response JSON")
    }

    /// Serialize response to NDJSON line.
    pub fn to_ndjson_line(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_line_roundtrip() {
        let mut params = HashMap::new();
        params.insert("row".to_string(), json!(2));
        let request = Request::new("delete_row", params);

        let line = request.to_ndjson_line().unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);

        let parsed = Request::from_ndjson_line(&line).unwrap();
        assert_eq!(parsed.id, request.id);
        assert_eq!(parsed.v, 1);
        assert_eq!(parsed.params["row"], json!(2));
    }

    #[test]
    fn test_params_optional() {
        let parsed = Request::from_ndjson_line(r#"{"id":"a","v":1,"method":"health"}"#).unwrap();
        assert!(parsed.params.is_empty());
    }

    #[test]
    fn test_error_response_shape() {
        let response = Response::error("a".into(), codes::UNKNOWN_METHOD, "nope".into(), 0.5);
        let value: Value = serde_json::from_str(&response.to_ndjson_line().unwrap()).unwrap();

        assert_eq!(value["ok"], json!(false));
        assert_eq!(value["result"], Value::Null);
        assert_eq!(value["error"]["code"], json!("UNKNOWN_METHOD"));
        assert_eq!(value["meta"]["protocol_v"], json!(1));
    }
}
