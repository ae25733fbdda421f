//! Turning user row choices into an order-preserving subset of the table.

use super::fuzzy;
use super::store::{Contact, ContactStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Which rows a send applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "values", rename_all = "snake_case")]
pub enum Selection {
    All,
    /// 0-based row indices
    Rows(Vec<usize>),
    /// Every row whose id equals one of these
    Ids(Vec<String>),
    /// Name queries (exact, partial, then fuzzy)
    Names(Vec<String>),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Row {row} does not exist (table has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("No contact matches name '{0}'")]
    NameNotFound(String),
}

/// A selected row together with its position in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedContact {
    pub row: usize,
    pub contact: Contact,
}

impl Selection {
    /// Resolve against the table. Rows come back in table order, each once.
    pub fn resolve(&self, store: &ContactStore) -> Result<Vec<SelectedContact>, SelectionError> {
        let contacts = store.contacts();
        let rows: BTreeSet<usize> = match self {
            Selection::All => (0..contacts.len()).collect(),
            Selection::Rows(rows) => {
                if let Some(&row) = rows.iter().find(|&&row| row >= contacts.len()) {
                    return Err(SelectionError::RowOutOfRange {
                        row,
                        len: contacts.len(),
                    });
                }
                rows.iter().copied().collect()
            }
            Selection::Ids(ids) => contacts
                .iter()
                .enumerate()
                .filter(|(_, c)| ids.iter().any(|id| id.trim() == c.id.trim()))
                .map(|(row, _)| row)
                .collect(),
            Selection::Names(names) => {
                let mut rows = BTreeSet::new();
                for name in names {
                    let found = fuzzy::find_rows(name, contacts, fuzzy::DEFAULT_THRESHOLD);
                    if found.is_empty() {
                        return Err(SelectionError::NameNotFound(name.clone()));
                    }
                    rows.extend(found);
                }
                rows
            }
        };

        Ok(rows
            .into_iter()
            .map(|row| SelectedContact {
                row,
                contact: contacts[row].clone(),
            })
            .collect())
    }
}

/// Parse a comma-separated list of row indices ("0,2, 5").
pub fn parse_rows(input: &str) -> Result<Vec<usize>, std::num::ParseIntError> {
    split_list(input).map(|part| part.parse::<usize>()).collect()
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ContactStore {
        let mut store = ContactStore::new();
        store.add("10", "Asha", "9876543210");
        store.add("11", "Ravi", "9812345678");
        store.add("10", "Meera", "9800000000");
        store
    }

    fn rows(selected: &[SelectedContact]) -> Vec<usize> {
        selected.iter().map(|s| s.row).collect()
    }

    #[test]
    fn test_all_in_table_order() {
        let selected = Selection::All.resolve(&store()).unwrap();
        assert_eq!(rows(&selected), vec![0, 1, 2]);
    }

    #[test]
    fn test_rows_sorted_and_deduplicated() {
        let selected = Selection::Rows(vec![2, 0, 2]).resolve(&store()).unwrap();
        assert_eq!(rows(&selected), vec![0, 2]);
        assert_eq!(selected[1].contact.name, "Meera");
    }

    #[test]
    fn test_rows_out_of_range() {
        let err = Selection::Rows(vec![0, 7]).resolve(&store()).unwrap_err();
        assert_eq!(err, SelectionError::RowOutOfRange { row: 7, len: 3 });
    }

    #[test]
    fn test_ids_ignore_surrounding_whitespace() {
        let store = ContactStore::from_contacts(vec![Contact {
            id: " 7".into(),
            name: "Asha".into(),
            phone: "+919876543210".into(),
        }]);
        let selected = Selection::Ids(vec!["7 ".into()]).resolve(&store).unwrap();
        assert_eq!(rows(&selected), vec![0]);
    }

    #[test]
    fn test_ids_match_every_row() {
        let selected = Selection::Ids(vec!["10".into()]).resolve(&store()).unwrap();
        assert_eq!(rows(&selected), vec![0, 2]);
    }

    #[test]
    fn test_names() {
        let selected = Selection::Names(vec!["meera".into(), "ASHA".into()])
            .resolve(&store())
            .unwrap();
        assert_eq!(rows(&selected), vec![0, 2]);

        let err = Selection::Names(vec!["Nobody".into()]).resolve(&store()).unwrap_err();
        assert_eq!(err, SelectionError::NameNotFound("Nobody".into()));
    }

    #[test]
    fn test_empty_selection() {
        assert!(Selection::Rows(vec![]).resolve(&store()).unwrap().is_empty());
        assert!(Selection::All.resolve(&ContactStore::new()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rows() {
        assert_eq!(parse_rows("0, 2,,5").unwrap(), vec![0, 2, 5]);
        assert!(parse_rows("1,x").is_err());
        assert!(parse_rows("").unwrap().is_empty());
    }
}
