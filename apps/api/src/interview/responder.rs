//! Responder: the collaborator that turns a role-tagged prompt into text.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::interview::transcript::ChatMessage;

/// A fully assembled generation request: a persona plus the ordered messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("responder unavailable: {0}")]
    Unavailable(String),

    #[error("responder timed out after {0:?}")]
    Timeout(Duration),

    #[error("responder returned empty output")]
    EmptyOutput,
}

/// Generates text from a prompt. Output content may vary between calls but must
/// be non-empty; anything else is reported as an error.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String, ResponderError>;
}
