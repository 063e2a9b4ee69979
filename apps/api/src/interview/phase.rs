//! Interview phases and the transition rule between them.
//!
//! The rule is a pure function of `(phase, terminate_flag)` and knows nothing
//! about the phase handlers, so it can be tested on its own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Ask,
    Feedback,
    Summary,
}

impl Phase {
    pub const INITIAL: Phase = Phase::Ask;

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Ask => "ask",
            Phase::Feedback => "feedback",
            Phase::Summary => "summary",
        }
    }

    pub fn is_terminal(self) -> bool {
        next_phase(self, false).is_none() && next_phase(self, true).is_none()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown phase '{0}' (expected ask, feedback or summary)")]
pub struct UnknownPhase(pub String);

impl FromStr for Phase {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ask" => Ok(Phase::Ask),
            "feedback" => Ok(Phase::Feedback),
            "summary" => Ok(Phase::Summary),
            _ => Err(UnknownPhase(s.to_string())),
        }
    }
}

/// Transition table.
///
/// | from       | terminate_flag | to        |
/// |------------|----------------|-----------|
/// | `Ask`      | any            | `Feedback`|
/// | `Feedback` | `true`         | `Summary` |
/// | `Feedback` | `false`        | `Ask`     |
/// | `Summary`  | any            | none      |
pub fn next_phase(current: Phase, terminate_flag: bool) -> Option<Phase> {
    match (current, terminate_flag) {
        (Phase::Ask, _) => Some(Phase::Feedback),
        (Phase::Feedback, true) => Some(Phase::Summary),
        (Phase::Feedback, false) => Some(Phase::Ask),
        (Phase::Summary, _) => None,
    }
}
