pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::corpus::handlers as corpus_handlers;
use crate::interview::handlers as interview_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Document API
        .route(
            "/api/v1/documents",
            get(corpus_handlers::handle_get_corpus).post(corpus_handlers::handle_upload),
        )
        // Session API
        .route(
            "/api/v1/sessions",
            post(interview_handlers::handle_create_session),
        )
        .route(
            "/api/v1/sessions/:id",
            get(interview_handlers::handle_get_session)
                .delete(interview_handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/phases/:phase",
            post(interview_handlers::handle_run_phase),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
