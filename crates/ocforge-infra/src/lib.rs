//! Infrastructure layer for OC Forge.
//!
//! Contains implementations of the collaborator traits defined in `ocforge-core`:
//! SQLite storage for characters and accounts, config loading, and
//! filesystem adapters for the data directory and card export.

pub mod config;
pub mod filesystem;
pub mod sqlite;
