use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::corpus::CorpusError;
use crate::interview::registry::RegistryError;
use crate::interview::InterviewError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    /// Phase requested out of sequence or after the summary.
    #[error("Invalid phase: {0}")]
    InvalidPhase(String),

    #[error("Phase in progress: {0}")]
    PhaseInProgress(String),

    /// Generation failed; the session was not changed and the phase can be retried.
    #[error("Responder error: {0}")]
    Responder(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<InterviewError> for AppError {
    fn from(e: InterviewError) -> Self {
        match e {
            InterviewError::Responder(_) => AppError::Responder(e.to_string()),
            InterviewError::InvalidPhase { .. } => AppError::InvalidPhase(e.to_string()),
            InterviewError::MalformedTurn(_) | InterviewError::NoTopics => {
                AppError::Validation(e.to_string())
            }
        }
    }
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NotFound(_) => AppError::NotFound(e.to_string()),
            RegistryError::Busy(_) => AppError::PhaseInProgress(e.to_string()),
            RegistryError::Interview(inner) => inner.into(),
        }
    }
}

impl From<CorpusError> for AppError {
    fn from(e: CorpusError) -> Self {
        match e {
            CorpusError::UnsupportedFileType(_) | CorpusError::Encoding(_) => {
                AppError::Validation(e.to_string())
            }
            CorpusError::Pdf(_) | CorpusError::EmptyDocument => {
                AppError::UnprocessableEntity(e.to_string())
            }
            CorpusError::Io(_) | CorpusError::Index(_) | CorpusError::Task(_) => {
                AppError::Internal(anyhow::Error::new(e))
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, retryable) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), false),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                false,
            ),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
                false,
            ),
            AppError::InvalidPhase(msg) => {
                (StatusCode::CONFLICT, "INVALID_PHASE", msg.clone(), false)
            }
            AppError::PhaseInProgress(msg) => (
                StatusCode::CONFLICT,
                "PHASE_IN_PROGRESS",
                msg.clone(),
                true,
            ),
            AppError::Responder(msg) => {
                tracing::error!("Responder error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "RESPONDER_FAILURE",
                    "The interviewer could not respond. Please try again.".to_string(),
                    true,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    false,
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "retryable": retryable
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::phase::Phase;
    use crate::interview::responder::ResponderError;

    #[test]
    fn test_responder_failure_is_retryable_503() {
        let err: AppError = InterviewError::Responder(ResponderError::EmptyOutput).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_invalid_phase_is_conflict() {
        let err: AppError = InterviewError::InvalidPhase {
            requested: Phase::Ask,
            expected: None,
        }
        .into();
        assert!(matches!(err, AppError::InvalidPhase(_)));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_registry_errors_map_to_status() {
        let id = uuid::Uuid::new_v4();
        let missing: AppError = RegistryError::NotFound(id).into();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let busy: AppError = RegistryError::Busy(id).into();
        assert_eq!(busy.into_response().status(), StatusCode::CONFLICT);

        let no_topics: AppError = RegistryError::Interview(InterviewError::NoTopics).into();
        assert_eq!(no_topics.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_corpus_errors_map_to_status() {
        let unsupported: AppError =
            CorpusError::UnsupportedFileType("resume.docx".to_string()).into();
        assert_eq!(unsupported.into_response().status(), StatusCode::BAD_REQUEST);

        let empty: AppError = CorpusError::EmptyDocument.into();
        assert_eq!(
            empty.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
