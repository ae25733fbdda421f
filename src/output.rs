//! Output formatting: JSON for scripts, plain text for people.
//!
//! CHANGELOG:
//! - 10/19/2026 - Text rendering for tables, notices and dispatch reports
//! - 10/12/2026 - Initial implementation

use crate::contacts::Contact;
use crate::notice::Notice;
use serde::Serialize;
use serde_json::{json, Value};

/// Output control settings from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct OutputControls {
    pub json: bool,
    pub compact: bool,
    pub fields: Option<String>,
    pub max_text_chars: Option<u32>,
}

impl OutputControls {
    /// Render data as JSON according to the controls.
    pub fn emit<T: Serialize>(&self, data: &T) -> String {
        let value = serde_json::to_value(data).unwrap_or(json!(null));

        let filtered = match self.fields {
            Some(ref fields) => filter_fields(&value, fields),
            None => value,
        };

        let truncated = match self.max_text_chars {
            Some(max_chars) => truncate_text_fields(&filtered, max_chars as usize),
            None => filtered,
        };

        if self.compact {
            serde_json::to_string(&truncated).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string_pretty(&truncated).unwrap_or_else(|_| "{}".to_string())
        }
    }

    /// Print data to stdout as JSON.
    pub fn print<T: Serialize>(&self, data: &T) {
        println!("{}", self.emit(data));
    }

    /// Shorten free text for the human view.
    pub fn clip(&self, text: &str) -> String {
        match self.max_text_chars {
            Some(max) => truncate_chars(text, max as usize),
            None => text.to_string(),
        }
    }
}

/// Filter objects (recursively through arrays) down to the listed fields.
fn filter_fields(value: &Value, fields: &str) -> Value {
    let field_list: Vec<&str> = fields.split(',').map(|s| s.trim()).collect();

    match value {
        Value::Array(arr) => Value::Array(arr.iter().map(|v| filter_fields(v, fields)).collect()),
        Value::Object(map) => {
            let mut filtered = serde_json::Map::new();
            for field in &field_list {
                if let Some(v) = map.get(*field) {
                    filtered.insert(field.to_string(), v.clone());
                }
            }
            Value::Object(filtered)
        }
        _ => value.clone(),
    }
}

/// Truncate string fields in a JSON value.
fn truncate_text_fields(value: &Value, max_chars: usize) -> Value {
    match value {
        Value::String(s) => Value::String(truncate_chars(s, max_chars)),
        Value::Array(arr) => {
            Value::Array(arr.iter().map(|v| truncate_text_fields(v, max_chars)).collect())
        }
        Value::Object(map) => {
            let mut truncated = serde_json::Map::new();
            for (k, v) in map {
                truncated.insert(k.clone(), truncate_text_fields(v, max_chars));
            }
            Value::Object(truncated)
        }
        _ => value.clone(),
    }
}

/// Cut at a character boundary and mark the cut with `...`.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Plain-text contact table with 0-based row numbers.
pub fn format_table(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return "No contacts. Import a spreadsheet or add an entry.".to_string();
    }

    let id_w = contacts.iter().map(|c| c.id.chars().count()).max().unwrap_or(0).max(2);
    let name_w = contacts.iter().map(|c| c.name.chars().count()).max().unwrap_or(0).max(4);

    let mut out = format!("{:>4}  {:<id_w$}  {:<name_w$}  Phone\n", "#", "ID", "Name");
    out.push_str(&"-".repeat(4 + 2 + id_w + 2 + name_w + 2 + 5));
    for (row, c) in contacts.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!(
            "{:>4}  {:<id_w$}  {:<name_w$}  {}",
            row, c.id, c.name, c.phone
        ));
    }
    out
}

/// Print notices, errors to stderr.
pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        if notice.is_error() {
            eprintln!("{}", notice);
        } else {
            println!("{}", notice);
        }
    }
}

/// Format error as JSON.
pub fn format_error(error: &str) -> String {
    serde_json::to_string(&json!({
        "error": error,
        "success": false
    }))
    .unwrap_or_else(|_| format!(r#"{{"error":"{}"}}"#, error))
}
