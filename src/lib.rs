//! wabulk library
//!
//! Core of the bulk messaging tool, shared by the CLI and the session daemon.
//!
//! CHANGELOG:
//! - 10/19/2026 - Session reducer and daemon methods
//! - 10/12/2026 - Initial library structure

// Core modules
pub mod client;
pub mod commands;
pub mod compose;
pub mod config;
pub mod contacts;
pub mod daemon;
pub mod dispatch;
pub mod import;
pub mod notice;
pub mod output;
pub mod phone;
pub mod sender;
pub mod session;
