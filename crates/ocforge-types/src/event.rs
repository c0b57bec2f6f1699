//! Workbench persistence status and the events broadcast while editing.
//!
//! All variants are Clone + Send + Sync for use with tokio broadcast channels.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::character::CharacterId;

/// Persistence status of a workbench draft.
///
/// ```text
/// New ──save──▶ Saving ──ok──▶ Saved ──save──▶ Saving ──ok──▶ Saved
///                  │                              │
///                  └──err──▶ SaveFailed ──settle──┴──▶ New | Saved
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    New,
    Saving,
    Saved,
    SaveFailed,
}

impl SaveStatus {
    /// Status before any save attempt, given whether the draft has an id.
    pub fn resting(has_id: bool) -> Self {
        if has_id { SaveStatus::Saved } else { SaveStatus::New }
    }

    /// Enter `Saving`. Returns `None` while a save is already in flight.
    pub fn begin(self) -> Option<Self> {
        match self {
            SaveStatus::Saving => None,
            _ => Some(SaveStatus::Saving),
        }
    }

    /// Transition after the collaborator call resolved.
    pub fn finish(self, succeeded: bool) -> Self {
        match (self, succeeded) {
            (SaveStatus::Saving, true) => SaveStatus::Saved,
            (SaveStatus::Saving, false) => SaveStatus::SaveFailed,
            (other, _) => other,
        }
    }

    /// Leave `SaveFailed` for the resting status matching the id state.
    pub fn settle(self, has_id: bool) -> Self {
        match self {
            SaveStatus::SaveFailed => SaveStatus::resting(has_id),
            other => other,
        }
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveStatus::New => write!(f, "new"),
            SaveStatus::Saving => write!(f, "saving"),
            SaveStatus::Saved => write!(f, "saved"),
            SaveStatus::SaveFailed => write!(f, "save_failed"),
        }
    }
}

/// Generation controls that can be pending in the workbench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    Persona,
    Avatar,
}

/// Events emitted by a workbench session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkbenchEvent {
    /// The persistence status changed.
    StatusChanged { from: SaveStatus, to: SaveStatus },

    /// A generation control became pending.
    GenerationStarted { kind: GenerationKind },

    /// A generation result was written into the draft.
    GenerationCompleted { kind: GenerationKind },

    /// A save round-trip succeeded.
    Saved { id: CharacterId, created: bool },

    /// A save round-trip failed; the draft is unchanged.
    SaveFailed { reason: String },
}
