use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::corpus::chunker::ChunkConfig;
use crate::llm_client::DEFAULT_MODEL;
use crate::research::DEFAULT_WIKIPEDIA_API_URL;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub llm_model: String,
    pub port: u16,
    pub rust_log: String,
    pub corpus_path: String,
    pub retrieval_top_k: usize,
    pub chunk_config: ChunkConfig,
    pub phase_timeout: Duration,
    pub max_upload_bytes: usize,
    /// Look the topic keywords up on Wikipedia before asking.
    pub topic_research: bool,
    pub wikipedia_api_url: String,
    pub research_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let chunk_config = ChunkConfig {
            chunk_size: parse_env("CHUNK_SIZE", 500)?,
            chunk_overlap: parse_env("CHUNK_OVERLAP", 50)?,
        };
        if chunk_config.chunk_size == 0 || chunk_config.chunk_overlap >= chunk_config.chunk_size {
            bail!(
                "CHUNK_OVERLAP ({}) must be smaller than a non-zero CHUNK_SIZE ({})",
                chunk_config.chunk_overlap,
                chunk_config.chunk_size
            );
        }

        let retrieval_top_k: usize = parse_env("RETRIEVAL_TOP_K", 3)?;
        if retrieval_top_k == 0 {
            bail!("RETRIEVAL_TOP_K must be at least 1");
        }

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            corpus_path: std::env::var("CORPUS_PATH")
                .unwrap_or_else(|_| "vectorstore/index.json".to_string()),
            retrieval_top_k,
            chunk_config,
            phase_timeout: Duration::from_secs(parse_env("PHASE_TIMEOUT_SECS", 120)?),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            topic_research: parse_env("TOPIC_RESEARCH", true)?,
            wikipedia_api_url: std::env::var("WIKIPEDIA_API_URL")
                .unwrap_or_else(|_| DEFAULT_WIKIPEDIA_API_URL.to_string()),
            research_timeout: Duration::from_secs(parse_env("RESEARCH_TIMEOUT_SECS", 10)?),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: u16 = parse_env("INTERVIEWER_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("INTERVIEWER_TEST_BAD_TOP_K", "three");
        let result: Result<usize> = parse_env("INTERVIEWER_TEST_BAD_TOP_K", 3);
        assert!(result.is_err());
        std::env::remove_var("INTERVIEWER_TEST_BAD_TOP_K");
    }

    #[test]
    fn test_parse_env_bool() {
        std::env::set_var("INTERVIEWER_TEST_RESEARCH", "false");
        let value: bool = parse_env("INTERVIEWER_TEST_RESEARCH", true).unwrap();
        assert!(!value);
        std::env::remove_var("INTERVIEWER_TEST_RESEARCH");
    }

    #[test]
    fn test_parse_env_trims() {
        std::env::set_var("INTERVIEWER_TEST_TIMEOUT", " 45 ");
        let value: u64 = parse_env("INTERVIEWER_TEST_TIMEOUT", 120).unwrap();
        assert_eq!(value, 45);
        std::env::remove_var("INTERVIEWER_TEST_TIMEOUT");
    }
}
