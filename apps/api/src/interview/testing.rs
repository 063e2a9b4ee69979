//! Test doubles for the interview collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::interview::context::{ContextError, ContextLookup, ContextProvider};
use crate::interview::responder::{Prompt, Responder, ResponderError};

/// Replies "<prefix> #<n>" and records every prompt it receives.
pub struct NumberedResponder {
    prefix: &'static str,
    calls: AtomicUsize,
    prompts: Mutex<Vec<Prompt>>,
}

impl NumberedResponder {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> Prompt {
        self.prompts().pop().expect("responder was never called")
    }
}

#[async_trait]
impl Responder for NumberedResponder {
    async fn generate(&self, prompt: &Prompt) -> Result<String, ResponderError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("{} #{n}", self.prefix))
    }
}

/// Always fails as if the backend were unreachable.
pub struct FailingResponder;

#[async_trait]
impl Responder for FailingResponder {
    async fn generate(&self, _prompt: &Prompt) -> Result<String, ResponderError> {
        Err(ResponderError::Unavailable("connection refused".to_string()))
    }
}

/// Returns whitespace, violating the non-empty output contract.
pub struct BlankResponder;

#[async_trait]
impl Responder for BlankResponder {
    async fn generate(&self, _prompt: &Prompt) -> Result<String, ResponderError> {
        Ok("  \n".to_string())
    }
}

/// Sleeps before answering.
pub struct SlowResponder(pub Duration);

#[async_trait]
impl Responder for SlowResponder {
    async fn generate(&self, _prompt: &Prompt) -> Result<String, ResponderError> {
        tokio::time::sleep(self.0).await;
        Ok("too late".to_string())
    }
}

/// Returns a fixed lookup result and counts queries.
pub struct StaticContext {
    lookup: ContextLookup,
    pub queries: Mutex<Vec<Vec<String>>>,
}

impl StaticContext {
    pub fn new(lookup: ContextLookup) -> Self {
        Self {
            lookup,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn snippets(snippets: &[&str]) -> Self {
        Self::new(ContextLookup::Snippets(
            snippets.iter().map(|s| s.to_string()).collect(),
        ))
    }

    pub fn no_corpus() -> Self {
        Self::new(ContextLookup::NoCorpus)
    }
}

#[async_trait]
impl ContextProvider for StaticContext {
    async fn query(&self, keywords: &[String]) -> Result<ContextLookup, ContextError> {
        self.queries.lock().unwrap().push(keywords.to_vec());
        Ok(self.lookup.clone())
    }
}

/// Always errors.
pub struct BrokenContext;

#[async_trait]
impl ContextProvider for BrokenContext {
    async fn query(&self, _keywords: &[String]) -> Result<ContextLookup, ContextError> {
        Err(ContextError::Unavailable("index file is corrupt".to_string()))
    }
}
