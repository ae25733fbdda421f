//! In-memory contact table for one session.
//!
//! CHANGELOG:
//! - 10/19/2026 - Added snapshot replace and row removal
//! - 10/12/2026 - Initial implementation

use crate::phone;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of the contact table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub phone: String,
}

impl Contact {
    /// Build a contact, normalizing the raw phone number.
    pub fn new(id: impl Into<String>, name: impl Into<String>, raw_phone: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: phone::normalize(raw_phone),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Row {row} does not exist (table has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },
}

/// Ordered contact table. Ids are not required to be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactStore {
    contacts: Vec<Contact>,
}

impl ContactStore {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-built list of contacts (e.g. from an import).
    pub fn from_contacts(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }

    /// Append a contact built from raw form input. Returns the stored row.
    pub fn add(&mut self, id: &str, name: &str, raw_phone: &str) -> &Contact {
        self.contacts.push(Contact::new(id, name, raw_phone));
        &self.contacts[self.contacts.len() - 1]
    }

    /// Remove one row by 0-based index.
    pub fn remove(&mut self, row: usize) -> Result<Contact, StoreError> {
        if row >= self.contacts.len() {
            return Err(StoreError::RowOutOfRange {
                row,
                len: self.contacts.len(),
            });
        }
        Ok(self.contacts.remove(row))
    }

    /// Replace the whole table with an edited snapshot.
    pub fn replace(&mut self, snapshot: Vec<Contact>) {
        self.contacts = snapshot;
    }

    /// Drop every row.
    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    pub fn get(&self, row: usize) -> Option<&Contact> {
        self.contacts.get(row)
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_normalizes_and_appends() {
        let mut store = ContactStore::new();
        store.add("1", "Asha", "9876543210");
        let added = store.add("2", "Ravi", " 919812345678 ").clone();

        assert_eq!(store.len(), 2);
        assert_eq!(added.phone, "+919812345678");
        assert_eq!(store.get(0).map(|c| c.phone.as_str()), Some("+919876543210"));
        assert_eq!(store.get(1).map(|c| c.name.as_str()), Some("Ravi"));
    }

    #[test]
    fn test_duplicate_ids_allowed() {
        let mut store = ContactStore::new();
        store.add("1", "Asha", "9876543210");
        store.add("1", "Asha again", "9876543211");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_row() {
        let mut store = ContactStore::new();
        store.add("1", "Asha", "9876543210");
        store.add("2", "Ravi", "9812345678");

        let removed = store.remove(0).unwrap();
        assert_eq!(removed.name, "Asha");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().id, "2");
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut store = ContactStore::new();
        store.add("1", "Asha", "9876543210");
        assert_eq!(
            store.remove(3),
            Err(StoreError::RowOutOfRange { row: 3, len: 1 })
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replace_and_clear() {
        let mut store = ContactStore::new();
        store.add("1", "Asha", "9876543210");
        store.replace(vec![
            Contact::new("5", "Meera", "+447700900123"),
            Contact::new("6", "Kiran", "12345"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().phone, "12345");

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut store = ContactStore::new();
        store.add("7", "Asha", "9876543210");
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"id": "7", "name": "Asha", "phone": "+919876543210"}])
        );
    }
}
