// Interview workflow: transcript, phases, session state and the machine that
// sequences Ask -> Feedback -> (Ask | Summary).
// The machine only talks to its collaborators through the ContextProvider and
// Responder traits; concrete implementations live in `corpus` and `llm_client`.

pub mod context;
pub mod handlers;
pub mod machine;
pub mod phase;
pub mod prompts;
pub mod registry;
pub mod responder;
pub mod session;
pub mod transcript;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

use crate::interview::phase::Phase;
use crate::interview::responder::ResponderError;
use crate::interview::transcript::TurnError;

#[derive(Debug, Error)]
pub enum InterviewError {
    /// The Responder failed; the session is unchanged and the phase may be retried.
    #[error(transparent)]
    Responder(#[from] ResponderError),

    #[error("cannot run the {requested} phase: {}", describe_expected(.expected))]
    InvalidPhase {
        requested: Phase,
        expected: Option<Phase>,
    },

    #[error("malformed turn: {0}")]
    MalformedTurn(#[from] TurnError),

    #[error("at least one topic keyword is required")]
    NoTopics,
}

fn describe_expected(expected: &Option<Phase>) -> String {
    match expected {
        Some(phase) => format!("the session expects the {phase} phase next"),
        None => "the session is already summarized".to_string(),
    }
}
