//! Interview State Machine: sequences the Ask, Feedback and Summary phases.
//!
//! Flow: Ask → Feedback → (Ask | Summary), where the branch after Feedback is
//! decided by `phase::next_phase` from the session's `terminate_flag`.
//!
//! Every phase handler reads a `&SessionState` and returns a new `SessionState`.
//! Turns are appended to the new value only after the Responder call succeeded,
//! so a failed phase leaves the caller's state exactly as it was.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::interview::context::{ContextLookup, ContextProvider};
use crate::interview::phase::{next_phase, Phase};
use crate::interview::prompts::{
    ASK_PROMPT_TEMPLATE, EVALUATOR_SYSTEM, FEEDBACK_EXAMPLES, FEEDBACK_PREFIX,
    INTERVIEWER_SYSTEM, NO_CORPUS_PLACEHOLDER, NO_QUESTIONS_YET, NO_TOPIC_NOTES,
    SUMMARIZER_SYSTEM, SUMMARY_PROMPT,
};
use crate::interview::responder::{Prompt, Responder, ResponderError};
use crate::interview::session::SessionState;
use crate::interview::transcript::{ChatMessage, Role, Turn};
use crate::interview::InterviewError;

/// Result of one successful `invoke`.
#[derive(Debug, Clone)]
pub struct Step {
    pub state: SessionState,
    /// `None` once the Summary phase has run.
    pub next_phase: Option<Phase>,
}

/// Drives one session at a time through its phases. Holds no session data,
/// so a single machine can serve any number of independent sessions.
pub struct InterviewMachine {
    context: Arc<dyn ContextProvider>,
    /// Optional reference lookup on the topic keywords, independent of the resume.
    research: Option<Arc<dyn ContextProvider>>,
    responder: Arc<dyn Responder>,
    responder_timeout: Duration,
}

impl InterviewMachine {
    pub fn new(
        context: Arc<dyn ContextProvider>,
        responder: Arc<dyn Responder>,
        responder_timeout: Duration,
    ) -> Self {
        Self {
            context,
            research: None,
            responder,
            responder_timeout,
        }
    }

    /// Adds topic research to the Ask phase. Research failures never fail a phase.
    pub fn with_research(mut self, research: Arc<dyn ContextProvider>) -> Self {
        self.research = Some(research);
        self
    }

    /// Single entry point: runs `phase` on `state` and reports the phase to run next.
    ///
    /// Rejects a phase that is not the one the session expects (including any
    /// phase after Summary) without calling a collaborator.
    pub async fn invoke(&self, state: &SessionState, phase: Phase) -> Result<Step, InterviewError> {
        if state.expected_phase() != Some(phase) {
            return Err(InterviewError::InvalidPhase {
                requested: phase,
                expected: state.expected_phase(),
            });
        }

        let mut updated = match phase {
            Phase::Ask => self.ask(state).await?,
            Phase::Feedback => self.feedback(state).await?,
            Phase::Summary => self.summarize(state).await?,
        };

        let next = next_phase(phase, state.terminate_flag());
        updated.set_expected_phase(next);

        info!(
            "Phase {} complete: transcript_len={}, next={}",
            phase,
            updated.transcript().len(),
            next.map(Phase::as_str).unwrap_or("done")
        );

        Ok(Step {
            state: updated,
            next_phase: next,
        })
    }

    /// Ask handler: appends exactly one interviewer turn.
    pub async fn ask(&self, state: &SessionState) -> Result<SessionState, InterviewError> {
        if state.transcript().is_empty() {
            debug!("Opening question on {:?}", state.topic_keywords());
        }
        let context = self.resolve_context(state.topic_keywords()).await;
        let topic_notes = self.resolve_topic_notes(state.topic_keywords()).await;
        let prompt = build_ask_prompt(state, &context, &topic_notes);

        let question = self.generate(&prompt).await?;
        let turn = Turn::new(Role::Interviewer, question)?;

        let mut updated = state.clone();
        updated.transcript_mut().append(turn);
        Ok(updated)
    }

    /// Feedback handler: appends the applicant's answer, then the critique.
    ///
    /// Does not decide what comes next; `invoke` applies the transition rule.
    pub async fn feedback(&self, state: &SessionState) -> Result<SessionState, InterviewError> {
        // Validate the answer before spending a Responder call on it.
        let answer = Turn::new(Role::Applicant, state.pending_user_input())?;
        let prompt = build_feedback_prompt(state);

        let critique = self.generate(&prompt).await?;
        let feedback = Turn::new(Role::Feedback, critique)?;

        let mut updated = state.clone();
        updated.transcript_mut().append(answer);
        updated.transcript_mut().append(feedback);
        Ok(updated)
    }

    /// Summary handler: appends exactly one summarizer turn. Terminal.
    pub async fn summarize(&self, state: &SessionState) -> Result<SessionState, InterviewError> {
        let prompt = build_summary_prompt(state);

        let summary = self.generate(&prompt).await?;
        let turn = Turn::new(Role::Summarizer, summary)?;

        let mut updated = state.clone();
        updated.transcript_mut().append(turn);
        Ok(updated)
    }

    /// Looks up resume context, falling back to the placeholder when there is
    /// no corpus, no match, or the provider is down. Never fails.
    async fn resolve_context(&self, keywords: &[String]) -> String {
        match self.context.query(keywords).await {
            Ok(ContextLookup::Snippets(snippets)) if !snippets.is_empty() => {
                debug!("Context lookup returned {} snippets", snippets.len());
                snippets.join("\n\n")
            }
            Ok(ContextLookup::Snippets(_)) => {
                debug!("Context lookup matched nothing; using placeholder");
                NO_CORPUS_PLACEHOLDER.to_string()
            }
            Ok(ContextLookup::NoCorpus) => {
                info!("No document corpus available; asking from keywords only");
                NO_CORPUS_PLACEHOLDER.to_string()
            }
            Err(e) => {
                warn!("Context lookup failed, continuing without document context: {e}");
                NO_CORPUS_PLACEHOLDER.to_string()
            }
        }
    }

    async fn resolve_topic_notes(&self, keywords: &[String]) -> String {
        let Some(research) = &self.research else {
            return NO_TOPIC_NOTES.to_string();
        };
        match research.query(keywords).await {
            Ok(ContextLookup::Snippets(notes)) if !notes.is_empty() => {
                debug!("Topic research returned {} notes", notes.len());
                notes.join("\n\n")
            }
            Ok(_) => NO_TOPIC_NOTES.to_string(),
            Err(e) => {
                warn!("Topic research failed, continuing without notes: {e}");
                NO_TOPIC_NOTES.to_string()
            }
        }
    }

    /// Calls the Responder under the configured timeout and enforces non-empty output.
    async fn generate(&self, prompt: &Prompt) -> Result<String, ResponderError> {
        let text = tokio::time::timeout(self.responder_timeout, self.responder.generate(prompt))
            .await
            .map_err(|_| ResponderError::Timeout(self.responder_timeout))??;

        let text = text.trim();
        if text.is_empty() {
            return Err(ResponderError::EmptyOutput);
        }
        Ok(text.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt builders
// ────────────────────────────────────────────────────────────────────────────

fn transcript_then(state: &SessionState, instruction: String) -> Vec<ChatMessage> {
    let mut messages: Vec<ChatMessage> = state.transcript().render().collect();
    messages.push(ChatMessage::user(instruction));
    messages
}

fn build_ask_prompt(state: &SessionState, context: &str, topic_notes: &str) -> Prompt {
    let asked: Vec<String> = state
        .transcript()
        .by_role(Role::Interviewer)
        .map(|t| format!("- {}", t.content()))
        .collect();
    let asked_questions = if asked.is_empty() {
        NO_QUESTIONS_YET.to_string()
    } else {
        asked.join("\n")
    };

    let instruction = ASK_PROMPT_TEMPLATE
        .replace("{keywords}", &state.topic_keywords().join(", "))
        .replace("{asked_questions}", &asked_questions)
        .replace("{topic_notes}", topic_notes)
        .replace("{context}", context);

    Prompt {
        system: INTERVIEWER_SYSTEM.to_string(),
        messages: transcript_then(state, instruction),
    }
}

fn build_feedback_prompt(state: &SessionState) -> Prompt {
    let mut instruction = format!("{FEEDBACK_PREFIX}\n\n");
    for (answer, critique) in FEEDBACK_EXAMPLES {
        instruction.push_str(&format!("Applicant: {answer}\nFeedback: {critique}\n\n"));
    }
    instruction.push_str(&format!(
        "Applicant: {}\nFeedback:",
        state.pending_user_input()
    ));

    Prompt {
        system: EVALUATOR_SYSTEM.to_string(),
        messages: transcript_then(state, instruction),
    }
}

fn build_summary_prompt(state: &SessionState) -> Prompt {
    Prompt {
        system: SUMMARIZER_SYSTEM.to_string(),
        messages: transcript_then(state, SUMMARY_PROMPT.to_string()),
    }
}
