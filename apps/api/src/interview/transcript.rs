//! Transcript Store: the ordered, append-only log of interview turns.
//!
//! Turns are validated when they are constructed, so anything that reaches the
//! store is well-formed. Insertion order is the conversational order handed to
//! the Responder; nothing in this module can reorder, edit or remove a turn.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Interviewer,
    Applicant,
    Feedback,
    Summarizer,
}

impl Role {
    /// Collapses the interview roles onto the binary side a chat model understands.
    /// Only the applicant speaks from the user side.
    pub fn chat_role(self) -> ChatRole {
        match self {
            Role::Applicant => ChatRole::User,
            Role::Interviewer | Role::Feedback | Role::Summarizer => ChatRole::Assistant,
        }
    }
}

/// Conversational side of a message sent to a Responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// A single role-tagged message as consumed by a Responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    #[cfg(test)]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("{role:?} turn has no content")]
    EmptyContent { role: Role },
}

#[derive(Deserialize)]
struct RawTurn {
    role: Role,
    content: String,
}

/// One immutable entry in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTurn")]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    /// Builds a turn, rejecting blank content. Content is stored verbatim.
    pub fn new(role: Role, content: impl Into<String>) -> Result<Self, TurnError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(TurnError::EmptyContent { role });
        }
        Ok(Self { role, content })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage {
            role: self.role.chat_role(),
            content: self.content.clone(),
        }
    }
}

impl TryFrom<RawTurn> for Turn {
    type Error = TurnError;

    fn try_from(raw: RawTurn) -> Result<Self, Self::Error> {
        Turn::new(raw.role, raw.content)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a turn to the end of the log.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Turns produced by one role, in transcript order.
    pub fn by_role(&self, role: Role) -> impl Iterator<Item = &Turn> + '_ {
        self.turns.iter().filter(move |t| t.role == role)
    }

    /// Lazily renders the transcript as role-tagged chat messages.
    ///
    /// The returned iterator is finite and `Clone`; calling `render` again (or
    /// cloning the iterator) restarts from the first turn.
    pub fn render(&self) -> impl Iterator<Item = ChatMessage> + Clone + '_ {
        self.turns.iter().map(Turn::to_chat_message)
    }
}
