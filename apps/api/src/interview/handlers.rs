//! Axum route handlers for the interview session API.

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::phase::{Phase, UnknownPhase};
use crate::interview::registry::PhaseInput;
use crate::interview::session::SessionState;
use crate::interview::transcript::{Role, Transcript, Turn};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub topics: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub topics: Vec<String>,
    pub next_phase: Option<Phase>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PhaseRequest {
    /// The applicant's answer; required for the feedback phase.
    #[serde(default)]
    pub answer: Option<String>,
    /// Stop after this feedback and go to the summary.
    #[serde(default)]
    pub finish: bool,
}

#[derive(Debug, Serialize)]
pub struct PhaseResponse {
    pub session_id: Uuid,
    pub phase: Phase,
    pub turns: Vec<Turn>,
    pub next_phase: Option<Phase>,
    pub transcript_len: usize,
    /// True once the summary has been written.
    pub complete: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub topics: Vec<String>,
    pub transcript: Transcript,
    pub next_phase: Option<Phase>,
    pub complete: bool,
}

impl SessionView {
    fn new(session_id: Uuid, state: SessionState) -> Self {
        Self {
            session_id,
            topics: state.topic_keywords().to_vec(),
            next_phase: state.expected_phase(),
            complete: state.is_complete(),
            transcript: state.transcript().clone(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Starts an interview on the given topics. Blank topics are dropped; at least
/// one must remain.
pub async fn handle_create_session(
    State(state): State<AppState>,
    request: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Json<CreateSessionResponse>, AppError> {
    let Json(request) = request?;
    let session = SessionState::new(&request.topics)?;
    let topics = session.topic_keywords().to_vec();
    let next_phase = session.expected_phase();

    let session_id = state.sessions.create(session).await;
    info!("Started session {session_id} on topics {topics:?}");

    Ok(Json(CreateSessionResponse {
        session_id,
        topics,
        next_phase,
    }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SessionView>, AppError> {
    let Path(session_id) = path?;
    let session = state.sessions.snapshot(session_id).await?;
    Ok(Json(SessionView::new(session_id, session)))
}

/// POST /api/v1/sessions/:id/phases/:phase
///
/// Runs one phase (`ask`, `feedback` or `summary`) and returns the turns it
/// added plus the phase expected next. A Responder failure leaves the session
/// unchanged and is reported as retryable.
///
/// The body is optional; an empty body means no answer and no finish request.
pub async fn handle_run_phase(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, String)>, PathRejection>,
    body: Bytes,
) -> Result<Json<PhaseResponse>, AppError> {
    let Path((session_id, phase)) = path?;
    let phase: Phase = phase
        .parse()
        .map_err(|e: UnknownPhase| AppError::Validation(e.to_string()))?;
    let request = parse_phase_request(&body)?;

    let outcome = state
        .sessions
        .advance(
            session_id,
            &state.machine,
            phase,
            PhaseInput {
                answer: request.answer,
                finish: request.finish,
            },
        )
        .await?;

    let roles: Vec<Role> = outcome.appended.iter().map(Turn::role).collect();
    info!("Session {session_id}: {phase} phase appended {roles:?}");

    Ok(Json(PhaseResponse {
        session_id,
        phase,
        turns: outcome.appended,
        next_phase: outcome.next_phase,
        transcript_len: outcome.transcript_len,
        complete: phase.is_terminal(),
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(session_id) = path?;
    if state.sessions.remove(session_id).await {
        info!("Ended session {session_id}");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}

fn parse_phase_request(body: &[u8]) -> Result<PhaseRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(PhaseRequest::default());
    }
    let Json(request) = Json::<PhaseRequest>::from_bytes(body)?;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_default_request() {
        for body in [&b""[..], &b"  \n"[..]] {
            let request = parse_phase_request(body).unwrap();
            assert_eq!(request.answer, None);
            assert!(!request.finish);
        }
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        let err = parse_phase_request(br#"{"answer":"Use a covering index","finish":"yes"}"#)
            .unwrap_err();
        match err {
            AppError::Validation(message) => assert!(message.contains("finish"), "{message}"),
            other => panic!("expected a validation error, got {other:?}"),
        }

        assert!(parse_phase_request(b"{not json").is_err());
    }

    #[test]
    fn test_answer_and_finish_parsed() {
        let request =
            parse_phase_request(br#"{"answer":"Use a covering index","finish":true}"#).unwrap();
        assert_eq!(request.answer.as_deref(), Some("Use a covering index"));
        assert!(request.finish);
    }
}
