//! Topic research: short reference summaries for the interview's topic keywords.
//!
//! Looks each keyword up in the Wikipedia REST summary endpoint. The result is
//! reference material about the technology, not about the applicant, so it is
//! wired into the machine separately from the resume corpus.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::interview::context::{ContextError, ContextLookup, ContextProvider};

/// Summary endpoint used when `WIKIPEDIA_API_URL` is not set.
pub const DEFAULT_WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";
const USER_AGENT: &str = concat!("interviewer/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("invalid research URL '{0}'")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    title: String,
    #[serde(rename = "type", default)]
    page_type: String,
    #[serde(default)]
    extract: String,
}

pub struct WikipediaResearch {
    client: Client,
    base_url: Url,
}

impl WikipediaResearch {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ResearchError> {
        let parsed =
            Url::parse(base_url).map_err(|_| ResearchError::InvalidUrl(base_url.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(ResearchError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Page titles use underscores for spaces; the segment is percent-encoded.
    fn summary_url(&self, keyword: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&keyword.trim().replace(' ', "_"));
        }
        url
    }

    /// `Ok(None)` when there is no usable article for the keyword.
    async fn lookup(&self, keyword: &str) -> Result<Option<String>, reqwest::Error> {
        let response = self.client.get(self.summary_url(keyword)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let summary: PageSummary = response.error_for_status()?.json().await?;
        let extract = summary.extract.trim();
        if summary.page_type == "disambiguation" || extract.is_empty() {
            return Ok(None);
        }
        Ok(Some(format!("{} (Wikipedia): {}", summary.title, extract)))
    }
}

#[async_trait]
impl ContextProvider for WikipediaResearch {
    /// One note per keyword that has an article. Fails only when every lookup failed.
    async fn query(&self, keywords: &[String]) -> Result<ContextLookup, ContextError> {
        let mut notes = Vec::new();
        let mut failures = Vec::new();

        for keyword in keywords {
            match self.lookup(keyword).await {
                Ok(Some(note)) => notes.push(note),
                Ok(None) => debug!("No reference article for '{keyword}'"),
                Err(e) => {
                    warn!("Reference lookup for '{keyword}' failed: {e}");
                    failures.push(format!("{keyword}: {e}"));
                }
            }
        }

        if !failures.is_empty() && failures.len() == keywords.len() {
            return Err(ContextError::Unavailable(failures.join("; ")));
        }
        Ok(ContextLookup::Snippets(notes))
    }
}
