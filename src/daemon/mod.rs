//! Session daemon: one long-lived process owning the session state.
//!
//! CHANGELOG:
//! - 10/12/2026 - Initial module structure

pub mod protocol;
pub mod server;
pub mod service;
