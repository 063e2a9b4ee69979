//! Session State: everything carried between phase invocations of one interview.

use serde::Serialize;

use crate::interview::phase::Phase;
use crate::interview::transcript::Transcript;
use crate::interview::InterviewError;

/// Explicit per-session value passed into and returned from every phase call.
///
/// `topic_keywords` is fixed at construction. `expected_phase` is the cursor
/// the machine uses to reject out-of-sequence calls; `None` means the session
/// has been summarized and is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    transcript: Transcript,
    topic_keywords: Vec<String>,
    pending_user_input: String,
    terminate_flag: bool,
    expected_phase: Option<Phase>,
}

impl SessionState {
    /// Starts a session. Keywords are trimmed and blanks dropped; at least one
    /// must remain.
    pub fn new<I, S>(topic_keywords: I) -> Result<Self, InterviewError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let topic_keywords: Vec<String> = topic_keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        if topic_keywords.is_empty() {
            return Err(InterviewError::NoTopics);
        }

        Ok(Self {
            transcript: Transcript::new(),
            topic_keywords,
            pending_user_input: String::new(),
            terminate_flag: false,
            expected_phase: Some(Phase::INITIAL),
        })
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub(crate) fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn topic_keywords(&self) -> &[String] {
        &self.topic_keywords
    }

    pub fn pending_user_input(&self) -> &str {
        &self.pending_user_input
    }

    /// Stores the applicant's latest answer for the next Feedback phase.
    pub fn set_pending_user_input(&mut self, answer: impl Into<String>) {
        self.pending_user_input = answer.into();
    }

    pub fn terminate_flag(&self) -> bool {
        self.terminate_flag
    }

    /// Records whether the applicant wants to stop after the next Feedback phase.
    pub fn set_terminate_flag(&mut self, terminate: bool) {
        self.terminate_flag = terminate;
    }

    pub fn expected_phase(&self) -> Option<Phase> {
        self.expected_phase
    }

    pub(crate) fn set_expected_phase(&mut self, phase: Option<Phase>) {
        self.expected_phase = phase;
    }

    pub fn is_complete(&self) -> bool {
        self.expected_phase.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let state = SessionState::new(["Java", "MySQL"]).unwrap();
        assert!(state.transcript().is_empty());
        assert_eq!(state.topic_keywords(), ["Java", "MySQL"]);
        assert_eq!(state.pending_user_input(), "");
        assert!(!state.terminate_flag());
        assert_eq!(state.expected_phase(), Some(Phase::Ask));
        assert!(!state.is_complete());
    }

    #[test]
    fn test_keywords_are_trimmed_and_blanks_dropped() {
        let state = SessionState::new([" Java ", "", "  ", "Spring Boot"]).unwrap();
        assert_eq!(state.topic_keywords(), ["Java", "Spring Boot"]);
    }

    #[test]
    fn test_empty_keywords_rejected() {
        assert!(matches!(
            SessionState::new(Vec::<String>::new()),
            Err(InterviewError::NoTopics)
        ));
        assert!(matches!(
            SessionState::new([" ", ""]),
            Err(InterviewError::NoTopics)
        ));
    }

    #[test]
    fn test_flags_are_overwritten_each_cycle() {
        let mut state = SessionState::new(["Rust"]).unwrap();
        state.set_pending_user_input("first");
        state.set_pending_user_input("second");
        assert_eq!(state.pending_user_input(), "second");
        state.set_terminate_flag(true);
        assert!(state.terminate_flag());
    }
}
