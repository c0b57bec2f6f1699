//! Character workbench: one editing session over one draft.
//!
//! The `Workbench` owns the draft, runs the mock generators against it,
//! hosts the simulated chat, and talks to the persistence and auth
//! collaborators only on explicit save or open.

pub mod controller;

pub use controller::{AvatarJob, PersonaJob, SaveOutcome, Workbench};
