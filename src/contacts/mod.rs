//! Contact table, row selection and fuzzy name lookup.

pub mod fuzzy;
pub mod selection;
pub mod store;

pub use selection::{Selection, SelectionError};
pub use store::{Contact, ContactStore, StoreError};
