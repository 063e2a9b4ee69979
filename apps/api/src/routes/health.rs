use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and what the interviewer currently has loaded.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let corpus = state.corpus.summary().await;

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "interviewer-api",
        "active_sessions": state.sessions.len().await,
        "corpus_loaded": corpus.is_some(),
        "topic_research": state.config.topic_research,
    }))
}
