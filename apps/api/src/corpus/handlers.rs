use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::corpus::store::CorpusSummary;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/documents
///
/// Multipart upload of a resume or portfolio (`file` field; pdf, txt or md).
/// Replaces the current corpus.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CorpusSummary>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        info!("Received upload '{}' ({} bytes)", file_name, bytes.len());
        let summary = state.corpus.ingest(file_name, bytes).await?;
        return Ok(Json(summary));
    }

    Err(AppError::Validation(
        "Multipart body must contain a 'file' field".to_string(),
    ))
}

/// GET /api/v1/documents
///
/// Describes the currently indexed document.
pub async fn handle_get_corpus(
    State(state): State<AppState>,
) -> Result<Json<CorpusSummary>, AppError> {
    state
        .corpus
        .summary()
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No document has been uploaded".to_string()))
}
