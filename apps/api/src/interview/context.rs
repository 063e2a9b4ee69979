//! Context Provider: the collaborator that supplies resume-derived snippets.

use async_trait::async_trait;
use thiserror::Error;

/// Outcome of a context lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextLookup {
    /// Zero or more snippets relevant to the keywords, best first.
    Snippets(Vec<String>),
    /// No document has been ingested, so there is nothing to search.
    NoCorpus,
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("context provider unavailable: {0}")]
    Unavailable(String),
}

/// Read-only, idempotent lookup of resume context by topic keywords.
///
/// Carried by the interview machine as `Arc<dyn ContextProvider>`.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    async fn query(&self, keywords: &[String]) -> Result<ContextLookup, ContextError>;
}
