use std::sync::Arc;

use crate::config::Config;
use crate::corpus::store::CorpusStore;
use crate::interview::machine::InterviewMachine;
use crate::interview::registry::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless orchestrator shared by every session.
    pub machine: Arc<InterviewMachine>,
    pub sessions: SessionRegistry,
    /// Uploaded resume corpus. Also the machine's Context Provider.
    pub corpus: Arc<CorpusStore>,
    pub config: Config,
}
