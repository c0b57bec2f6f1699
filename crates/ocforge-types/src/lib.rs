//! Shared domain types for OC Forge.
//!
//! This crate contains the core domain types used across the workspace:
//! characters and drafts, users and sessions, chat transcripts, workbench
//! events, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod character;
pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod user;
