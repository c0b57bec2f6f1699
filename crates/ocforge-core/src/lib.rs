//! Business logic and collaborator trait definitions for OC Forge.
//!
//! This crate defines the "ports" (repository and auth traits) that the
//! infrastructure layer implements. It depends only on `ocforge-types` --
//! never on `ocforge-infra` or any database/IO crate.

pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod event;
pub mod generator;
pub mod repository;
pub mod workbench;

#[cfg(test)]
pub(crate) mod testing;
