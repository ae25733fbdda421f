//! Session commands: every call is one request to the daemon.
//!
//! CHANGELOG:
//! - 10/19/2026 - send waits without a read timeout
//! - 10/12/2026 - Initial implementation

use crate::client::DaemonClient;
use crate::contacts::{Contact, Selection};
use crate::daemon::protocol::Request;
use crate::notice::Notice;
use crate::output::{self, OutputControls};
use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;

/// Call the daemon and unwrap the result payload.
fn call(client: &DaemonClient, method: &str, params: Value) -> Result<Value> {
    let params: HashMap<String, Value> = match params {
        Value::Object(map) => map.into_iter().collect(),
        _ => HashMap::new(),
    };
    let response = client
        .call(&Request::new(method, params))
        .with_context(|| format!("Daemon request '{}' failed", method))?;

    if response.ok {
        Ok(response.result.unwrap_or(Value::Null))
    } else {
        let error = response
            .error
            .map(|e| format!("{} ({})", e.message, e.code))
            .unwrap_or_else(|| "unknown error".to_string());
        Err(anyhow!(error))
    }
}

fn notices_of(result: &Value) -> Vec<Notice> {
    result
        .get("notices")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

fn table_of(result: &Value) -> Vec<Contact> {
    result
        .get("table")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

/// Print a result and turn error notices into a failing exit status.
fn finish(result: &Value, show_table: bool, output: &OutputControls) -> Result<()> {
    let notices = notices_of(result);

    if output.json {
        output.print(result);
    } else {
        output::print_notices(&notices);
        if show_table {
            println!("{}", output::format_table(&table_of(result)));
        }
    }

    let errors = notices.iter().filter(|n| n.is_error()).count();
    if errors > 0 {
        return Err(anyhow!("{} error(s) reported", errors));
    }
    Ok(())
}

/// Upload a spreadsheet into the session (replaces the table).
pub fn import(client: &DaemonClient, file: &Path, output: &OutputControls) -> Result<()> {
    let path = std::fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf());
    let result = call(client, "import", json!({ "path": path.to_string_lossy() }))?;
    finish(&result, true, output)
}

pub fn open_form(client: &DaemonClient, output: &OutputControls) -> Result<()> {
    let result = call(client, "open_form", json!({}))?;
    if !output.json {
        println!("Add form: {}", result["add_form"].as_str().unwrap_or("unknown"));
    }
    finish(&result, false, output)
}

pub fn cancel_form(client: &DaemonClient, output: &OutputControls) -> Result<()> {
    let result = call(client, "cancel_form", json!({}))?;
    if !output.json {
        println!("Add form: {}", result["add_form"].as_str().unwrap_or("unknown"));
    }
    finish(&result, false, output)
}

/// Submit the add-entry form.
pub fn add(client: &DaemonClient, id: &str, name: &str, phone: &str, output: &OutputControls) -> Result<()> {
    let result = call(client, "add", json!({ "id": id, "name": name, "phone": phone }))?;
    finish(&result, false, output)
}

pub fn list(client: &DaemonClient, output: &OutputControls) -> Result<()> {
    let result = call(client, "list", json!({}))?;
    if output.json {
        output.print(&result["table"]);
        return Ok(());
    }
    finish(&result, true, output)
}

pub fn delete_row(client: &DaemonClient, row: usize, output: &OutputControls) -> Result<()> {
    let result = call(client, "delete_row", json!({ "row": row }))?;
    finish(&result, true, output)
}

/// Compose without sending.
pub fn preview(client: &DaemonClient, template: &str, selection: &Selection, output: &OutputControls) -> Result<()> {
    let result = call(
        client,
        "preview",
        json!({ "template": template, "selection": selection }),
    )?;

    if !output.json {
        if let Some(messages) = result["messages"].as_array() {
            for m in messages {
                println!(
                    "#{} {} ({}): {}",
                    m["row"],
                    m["name"].as_str().unwrap_or(""),
                    m["phone"].as_str().unwrap_or(""),
                    output.clip(m["body"].as_str().unwrap_or(""))
                );
            }
        }
    }
    finish(&result, false, output)
}

/// Send the template to the selected rows. Blocks until every send is done.
pub fn send(client: &DaemonClient, template: &str, selection: &Selection, output: &OutputControls) -> Result<()> {
    let patient = client.with_timeout(None);
    let result = call(
        &patient,
        "send",
        json!({ "template": template, "selection": selection }),
    )?;

    if !output.json {
        if let Some(report) = result.get("report") {
            println!(
                "Sent {}, failed {}",
                report["sent"].as_u64().unwrap_or(0),
                report["failed"].as_u64().unwrap_or(0)
            );
        }
    }
    finish(&result, false, output)
}

pub fn delete_all(client: &DaemonClient, output: &OutputControls) -> Result<()> {
    let result = call(client, "delete_all", json!({}))?;
    finish(&result, false, output)
}

/// Daemon health.
pub fn status(client: &DaemonClient, output: &OutputControls) -> Result<()> {
    let result = call(client, "health", json!({}))?;
    if output.json {
        output.print(&result);
    } else {
        println!(
            "Daemon running (pid {}, since {}), {} contacts loaded{}",
            result["pid"],
            result["started_at"].as_str().unwrap_or("?"),
            result["contacts_loaded"],
            if result["dry_run"].as_bool().unwrap_or(false) {
                ", dry run"
            } else {
                ""
            }
        );
    }
    Ok(())
}
