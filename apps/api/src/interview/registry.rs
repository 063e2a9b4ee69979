//! In-memory home for live interview sessions.
//!
//! Each session sits behind its own async mutex. A phase call holds that mutex
//! for its whole duration, so two calls on the same session can never overlap,
//! while calls on different sessions never contend. A call that finds its
//! session busy is rejected instead of queued.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use crate::interview::machine::InterviewMachine;
use crate::interview::phase::Phase;
use crate::interview::session::SessionState;
use crate::interview::transcript::Turn;
use crate::interview::InterviewError;

type SessionHandle = Arc<Mutex<SessionState>>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("session {0} not found")]
    NotFound(Uuid),

    #[error("session {0} already has a phase in progress")]
    Busy(Uuid),

    #[error(transparent)]
    Interview(#[from] InterviewError),
}

/// Caller-supplied inputs for a phase call. Only read by the Feedback phase.
#[derive(Debug, Clone, Default)]
pub struct PhaseInput {
    pub answer: Option<String>,
    pub finish: bool,
}

/// What a successful phase call added to the session.
#[derive(Debug, Clone)]
pub struct PhaseOutcome {
    pub appended: Vec<Turn>,
    pub next_phase: Option<Phase>,
    pub transcript_len: usize,
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, state: SessionState) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(state)));
        id
    }

    /// Clone of the current state. Waits for an in-flight phase to finish.
    pub async fn snapshot(&self, id: Uuid) -> Result<SessionState, RegistryError> {
        let handle = self.handle(id).await?;
        let state = handle.lock().await;
        Ok(state.clone())
    }

    /// Ends a session. Returns false if it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Takes exclusive hold of a session for one phase call.
    pub async fn claim(&self, id: Uuid) -> Result<OwnedMutexGuard<SessionState>, RegistryError> {
        let handle = self.handle(id).await?;
        handle.try_lock_owned().map_err(|_| RegistryError::Busy(id))
    }

    /// Runs one phase on a stored session and commits the result.
    ///
    /// Inputs are staged on a copy; the stored state is replaced only when the
    /// machine succeeds, so any error leaves the session as it was.
    pub async fn advance(
        &self,
        id: Uuid,
        machine: &InterviewMachine,
        phase: Phase,
        input: PhaseInput,
    ) -> Result<PhaseOutcome, RegistryError> {
        let mut stored = self.claim(id).await?;

        let mut staged = stored.clone();
        if phase == Phase::Feedback {
            staged.set_pending_user_input(input.answer.unwrap_or_default());
            staged.set_terminate_flag(input.finish);
        }

        let step = machine.invoke(&staged, phase).await?;

        let previous_len = stored.transcript().len();
        let appended = step.state.transcript().turns()[previous_len..].to_vec();
        let transcript_len = step.state.transcript().len();
        *stored = step.state;

        Ok(PhaseOutcome {
            appended,
            next_phase: step.next_phase,
            transcript_len,
        })
    }

    async fn handle(&self, id: Uuid) -> Result<SessionHandle, RegistryError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }
}
