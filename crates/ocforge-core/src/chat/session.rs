//! Chat session holding the transcript and the single in-flight reply.

use ocforge_types::character::CharacterDraft;
use ocforge_types::chat::{ChatMessage, ChatRole};

/// What the reply source needs to answer one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    pub character_name: String,
    pub input: String,
}

/// Transcript of a chat with one character.
///
/// Sending is split in two: [`ChatSession::begin_send`] appends the user
/// message and marks a reply as pending, [`ChatSession::complete_reply`]
/// appends the reply. Input arriving while a reply is pending is dropped,
/// not queued.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a reply is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of completed user/assistant exchanges.
    pub fn turn_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == ChatRole::Assistant)
            .count()
    }

    /// Append the user's message and mark a reply as pending.
    ///
    /// Returns `None` without touching the transcript when the input is
    /// blank, a reply is already pending, or the character has no name or
    /// persona yet.
    pub fn begin_send(&mut self, draft: &CharacterDraft, input: &str) -> Option<ReplyRequest> {
        if input.trim().is_empty() {
            return None;
        }
        if self.pending {
            tracing::debug!("reply pending, ignoring chat input");
            return None;
        }
        if !draft.can_chat() {
            tracing::debug!("character has no name or persona, chat disabled");
            return None;
        }

        self.messages.push(ChatMessage::user(input));
        self.pending = true;
        Some(ReplyRequest {
            character_name: draft.name.clone(),
            input: input.to_string(),
        })
    }

    /// Append the character's reply and clear the pending flag.
    ///
    /// Returns `false` if no reply was pending.
    pub fn complete_reply(&mut self, reply: impl Into<String>) -> bool {
        if !self.pending {
            return false;
        }
        self.messages.push(ChatMessage::assistant(reply));
        self.pending = false;
        true
    }
}
