//! Commands that run without a daemon: normalize, preview, blast.

use crate::compose;
use crate::contacts::{ContactStore, Selection};
use crate::dispatch;
use crate::import;
use crate::notice::Notice;
use crate::output::{self, OutputControls};
use crate::phone;
use crate::sender::{DryRunSender, MessageSender, SendTiming, WhatsAppWebSender};
use anyhow::{anyhow, Context, Result};
use serde_json::json;
use std::path::Path;

/// Show the normalized form of each phone number.
pub fn normalize(phones: &[String], output: &OutputControls) -> Result<()> {
    let pairs: Vec<_> = phones
        .iter()
        .map(|raw| json!({ "raw": raw, "normalized": phone::normalize(raw) }))
        .collect();

    if output.json {
        output.print(&pairs);
    } else {
        for (raw, pair) in phones.iter().zip(&pairs) {
            println!("{} -> {}", raw, pair["normalized"].as_str().unwrap_or(""));
        }
    }
    Ok(())
}

fn load(file: &Path) -> Result<ContactStore> {
    let contacts = import::import_file(file).with_context(|| format!("Import of {:?} failed", file))?;
    Ok(ContactStore::from_contacts(contacts))
}

fn placeholder_notices(template: &str) -> Vec<Notice> {
    let unknown = compose::unresolved_placeholders(template);
    if unknown.is_empty() {
        Vec::new()
    } else {
        vec![Notice::warning(format!(
            "Template placeholders left as-is: {}",
            unknown.join(", ")
        ))]
    }
}

/// Compose messages for a spreadsheet without sending anything.
pub fn preview(file: &Path, template: &str, selection: &Selection, output: &OutputControls) -> Result<()> {
    let store = load(file)?;
    let selected = selection.resolve(&store)?;
    let messages = compose::preview(&selected, template);
    let notices = placeholder_notices(template);

    if output.json {
        output.print(&json!({ "messages": messages, "notices": notices }));
    } else {
        output::print_notices(&notices);
        for m in &messages {
            println!("#{} {} ({}): {}", m.row, m.name, m.phone, output.clip(&m.body));
        }
        if messages.is_empty() {
            println!("Nothing selected.");
        }
    }
    Ok(())
}

/// Import a spreadsheet and send to the selected rows in one go.
pub fn blast(
    file: &Path,
    template: &str,
    selection: &Selection,
    dry_run: bool,
    timing: &SendTiming,
    output: &OutputControls,
) -> Result<()> {
    let store = load(file)?;
    let selected = selection.resolve(&store)?;

    let mut sender: Box<dyn MessageSender> = if dry_run {
        Box::new(DryRunSender::new())
    } else {
        Box::new(WhatsAppWebSender::new())
    };

    let mut notices = placeholder_notices(template);
    let dispatched = dispatch::dispatch(&selected, template, &mut sender, timing);
    notices.extend(dispatched.notices);

    if output.json {
        output.print(&json!({ "report": dispatched.report, "notices": notices }));
    } else {
        output::print_notices(&notices);
        println!(
            "Sent {}, failed {}",
            dispatched.report.sent, dispatched.report.failed
        );
    }

    match dispatched.report.failed {
        0 => Ok(()),
        failed => Err(anyhow!("{} of {} messages failed", failed, dispatched.report.attempted())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn sheet(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("members.xlsx");
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        for (col, header) in ["ID", "Name", "Phone"].iter().enumerate() {
            ws.write_string(0, col as u16, *header).unwrap();
        }
        ws.write_string(1, 0, "1").unwrap();
        ws.write_string(1, 1, "Asha").unwrap();
        ws.write_string(1, 2, "9876543210").unwrap();
        ws.write_string(2, 0, "2").unwrap();
        ws.write_string(2, 1, "Ravi").unwrap();
        ws.write_string(2, 2, "12345").unwrap();
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_blast_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = sheet(dir.path());
        let controls = OutputControls {
            json: true,
            ..Default::default()
        };

        blast(&path, "Hi {name}", &Selection::All, true, &SendTiming::default(), &controls).unwrap();
    }

    #[test]
    fn test_preview_bad_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = sheet(dir.path());
        let err = preview(&path, "Hi", &Selection::Rows(vec![9]), &OutputControls::default())
            .unwrap_err();
        assert!(err.to_string().contains("Row 9"));
    }

    #[test]
    fn test_missing_columns_fail_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xlsx");
        let mut workbook = Workbook::new();
        workbook.add_worksheet().write_string(0, 0, "Phone").unwrap();
        workbook.save(&path).unwrap();

        let err = preview(&path, "Hi", &Selection::All, &OutputControls::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("missing: ID, Name"));
    }
}
