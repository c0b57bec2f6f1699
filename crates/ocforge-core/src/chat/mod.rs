//! Simulated chat with the character being edited.
//!
//! The transcript is append-only: a user message followed by the
//! character's reply, one exchange at a time.

pub mod session;

pub use session::{ChatSession, ReplyRequest};
