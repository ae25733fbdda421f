//! Spreadsheet import: first worksheet → validated contact list.
//!
//! The header row must contain `ID`, `Name` and `Phone` (case-sensitive,
//! surrounding whitespace ignored). Other columns are ignored.
//!
//! CHANGELOG:
//! - 10/19/2026 - Skip blank rows, report every missing column
//! - 10/12/2026 - Initial implementation

use crate::contacts::Contact;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

pub const REQUIRED_COLUMNS: [&str; 3] = ["ID", "Name", "Phone"];

#[derive(Error, Debug)]
pub enum ImportError {
    /// The validation failure: header row lacks required columns.
    #[error("Spreadsheet must have columns: ID, Name, Phone (missing: {})", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Failed to read spreadsheet {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: calamine::Error,
    },

    #[error("Spreadsheet {0} has no worksheets")]
    NoWorksheet(String),
}

impl ImportError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ImportError::MissingColumns { .. })
    }
}

/// Read the first worksheet of `path` and validate it.
pub fn import_file<P: AsRef<Path>>(path: P) -> Result<Vec<Contact>, ImportError> {
    let rows = read_rows(path.as_ref())?;
    let contacts = contacts_from_rows(&rows)?;
    info!(path = %path.as_ref().display(), contacts = contacts.len(), "spreadsheet imported");
    Ok(contacts)
}

/// Load the first worksheet as a grid of display strings.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, ImportError> {
    let shown = path.display().to_string();
    let mut workbook = open_workbook_auto(path).map_err(|source| ImportError::Read {
        path: shown.clone(),
        source,
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::NoWorksheet(shown.clone()))?
        .map_err(|source| ImportError::Read {
            path: shown.clone(),
            source,
        })?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    debug!(path = %path.display(), rows = rows.len(), "worksheet loaded");
    Ok(rows)
}

/// Render a cell the way a user typed it: `9876543210`, not `9876543210.0`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Validate a header-first grid and build contacts, normalizing phones.
pub fn contacts_from_rows(rows: &[Vec<String>]) -> Result<Vec<Contact>, ImportError> {
    let header: Vec<&str> = rows
        .first()
        .map(|h| h.iter().map(|c| c.trim()).collect())
        .unwrap_or_default();

    // First occurrence wins for duplicated headers
    let positions: Vec<Option<usize>> = REQUIRED_COLUMNS
        .iter()
        .map(|name| header.iter().position(|h| h == name))
        .collect();

    let [Some(id_col), Some(name_col), Some(phone_col)] = positions[..] else {
        let missing = REQUIRED_COLUMNS
            .iter()
            .zip(&positions)
            .filter(|(_, pos)| pos.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        return Err(ImportError::MissingColumns { missing });
    };

    let cell = |row: &[String], col: usize| row.get(col).cloned().unwrap_or_default();

    Ok(rows
        .iter()
        .skip(1)
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .map(|row| Contact::new(cell(row, id_col), cell(row, name_col), &cell(row, phone_col)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_valid_grid() {
        let rows = grid(&[
            &[" ID ", "Name", "Phone ", "Plan"],
            &["7", "Asha", "9876543210", "gold"],
            &["8", "Ravi", "919812345678", "silver"],
            &["9", "Meera", "+447700900123", ""],
        ]);
        let contacts = contacts_from_rows(&rows).unwrap();

        assert_eq!(
            contacts,
            vec![
                Contact::new("7", "Asha", "+919876543210"),
                Contact::new("8", "Ravi", "+919812345678"),
                Contact::new("9", "Meera", "+447700900123"),
            ]
        );
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let rows = grid(&[&["Phone", "ID", "Name"], &["9876543210", "1", "Asha"]]);
        let contacts = contacts_from_rows(&rows).unwrap();
        assert_eq!(contacts[0].id, "1");
        assert_eq!(contacts[0].phone, "+919876543210");
    }

    #[test]
    fn test_missing_phone_column() {
        let rows = grid(&[&["ID", "Name", "Mobile"], &["1", "Asha", "9876543210"]]);
        let err = contacts_from_rows(&rows).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Spreadsheet must have columns: ID, Name, Phone (missing: Phone)"
        );
    }

    #[test]
    fn test_headers_are_case_sensitive() {
        let rows = grid(&[&["id", "name", "phone"]]);
        match contacts_from_rows(&rows).unwrap_err() {
            ImportError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["ID", "Name", "Phone"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_grid_is_validation_error() {
        assert!(contacts_from_rows(&[]).unwrap_err().is_validation());
    }

    #[test]
    fn test_blank_and_short_rows() {
        let rows = grid(&[
            &["ID", "Name", "Phone"],
            &["", "", ""],
            &["1", "Asha"],
            &["  ", "", " "],
        ]);
        let contacts = contacts_from_rows(&rows).unwrap();
        assert_eq!(contacts, vec![Contact::new("1", "Asha", "")]);
    }

    #[test]
    fn test_header_only() {
        let rows = grid(&[&["ID", "Name", "Phone"]]);
        assert!(contacts_from_rows(&rows).unwrap().is_empty());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Float(9876543210.0)), "9876543210");
        assert_eq!(cell_text(&Data::Float(7.5)), "7.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::String("Asha".into())), "Asha");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_import_xlsx_file() {
        use rust_xlsxwriter::Workbook;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("members.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "ID ").unwrap();
        sheet.write_string(0, 1, "Name").unwrap();
        sheet.write_string(0, 2, "Phone").unwrap();
        sheet.write_number(1, 0, 7.0).unwrap();
        sheet.write_string(1, 1, "Asha").unwrap();
        sheet.write_number(1, 2, 9876543210.0).unwrap();
        sheet.write_string(2, 0, "A-2").unwrap();
        sheet.write_string(2, 1, "Ravi").unwrap();
        sheet.write_string(2, 2, "+14155551234").unwrap();
        workbook.save(&path).unwrap();

        let contacts = import_file(&path).unwrap();
        assert_eq!(
            contacts,
            vec![
                Contact::new("7", "Asha", "+919876543210"),
                Contact::new("A-2", "Ravi", "+14155551234"),
            ]
        );
    }

    #[test]
    fn test_import_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = import_file(dir.path().join("nope.xlsx")).unwrap_err();
        assert!(matches!(err, ImportError::Read { .. }));
        assert!(!err.is_validation());
    }
}
