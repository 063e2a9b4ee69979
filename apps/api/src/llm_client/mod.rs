/// LLM Client: the single point of entry for all Claude API calls.
///
/// No other module may call the Anthropic API directly. The interview core only
/// sees this client through the `Responder` trait.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::interview::responder::{Prompt, Responder, ResponderError};
use crate::interview::transcript::{ChatMessage, ChatRole};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Model used when `LLM_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 1024;
const MAX_RETRIES: u32 = 3;
/// Floor for a single attempt, however small the phase budget.
const MIN_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(1);
/// Deterministic sampling; the same transcript should produce comparable questions.
const TEMPERATURE: f32 = 0.0;

/// Opens a conversation that would otherwise start with an assistant message.
/// The Messages API requires the first message to come from the user.
const TRANSCRIPT_PREAMBLE: &str = "Here is the interview so far.";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, PartialEq, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Wraps the Anthropic Messages API with retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
}

impl LlmClient {
    /// `phase_budget` is the total time one phase may spend here, retries included.
    pub fn new(api_key: String, model: String, phase_budget: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(attempt_timeout(phase_budget))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(
        &self,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system,
            messages: to_api_messages(messages),
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl Responder for LlmClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, ResponderError> {
        let response = self
            .call(&prompt.system, &prompt.messages)
            .await
            .map_err(|e| ResponderError::Unavailable(e.to_string()))?;

        match response.text().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(ResponderError::EmptyOutput),
        }
    }
}

/// Exponential backoff before retry `attempt` (1-based): 1s, 2s, ...
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(1000 * (1 << (attempt - 1)))
}

/// Per-attempt HTTP timeout: what is left of the phase budget after all backoff
/// sleeps, split evenly across attempts. A timed-out attempt is retried like a 5xx.
fn attempt_timeout(phase_budget: Duration) -> Duration {
    let backoff: Duration = (1..MAX_RETRIES).map(backoff_delay).sum();
    (phase_budget.saturating_sub(backoff) / MAX_RETRIES).max(MIN_ATTEMPT_TIMEOUT)
}

/// Converts transcript messages to the Messages API shape.
///
/// Consecutive messages with the same role are merged (an interviewer question
/// followed by feedback, for instance), and a user preamble is inserted when the
/// conversation would open with an assistant message.
fn to_api_messages(messages: &[ChatMessage]) -> Vec<AnthropicMessage> {
    let mut out: Vec<AnthropicMessage> = Vec::with_capacity(messages.len() + 1);

    for message in messages {
        let role = message.role.as_str();
        if let Some(last) = out.last_mut().filter(|last| last.role == role) {
            last.content.push_str("\n\n");
            last.content.push_str(&message.content);
            continue;
        }

        if out.is_empty() && message.role == ChatRole::Assistant {
            out.push(AnthropicMessage {
                role: ChatRole::User.as_str(),
                content: TRANSCRIPT_PREAMBLE.to_string(),
            });
        }
        out.push(AnthropicMessage {
            role,
            content: message.content.clone(),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_role_messages_are_merged() {
        let messages = vec![
            ChatMessage::user("Topics: Rust"),
            ChatMessage::assistant("What is ownership?"),
            ChatMessage::user("Each value has one owner."),
            ChatMessage::assistant("Correct."),
            ChatMessage::assistant("What is borrowing?"),
            ChatMessage::user("Ask the next question."),
        ];

        let api = to_api_messages(&messages);
        let roles: Vec<&str> = api.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec!["user", "assistant", "user", "assistant", "user"]
        );
        assert_eq!(api[3].content, "Correct.\n\nWhat is borrowing?");
    }

    #[test]
    fn test_preamble_inserted_before_leading_assistant() {
        let messages = vec![
            ChatMessage::assistant("What is a trait object?"),
            ChatMessage::user("Summarize the interview."),
        ];

        let api = to_api_messages(&messages);
        assert_eq!(api.len(), 3);
        assert_eq!(api[0].role, "user");
        assert_eq!(api[0].content, TRANSCRIPT_PREAMBLE);
        assert_eq!(api[1].content, "What is a trait object?");
    }

    #[test]
    fn test_leading_user_message_has_no_preamble() {
        let api = to_api_messages(&[ChatMessage::user("hello")]);
        assert_eq!(
            api,
            vec![AnthropicMessage {
                role: "user",
                content: "hello".to_string()
            }]
        );
        assert!(to_api_messages(&[]).is_empty());
    }

    #[test]
    fn test_request_serializes_temperature_and_system() {
        let request = AnthropicRequest {
            model: DEFAULT_MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system: "You are an interviewer.",
            messages: to_api_messages(&[ChatMessage::user("Ask.")]),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["system"], "You are an interviewer.");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_attempts_fit_inside_phase_budget() {
        let budget = Duration::from_secs(120);
        let per_attempt = attempt_timeout(budget);
        let backoff: Duration = (1..MAX_RETRIES).map(backoff_delay).sum();

        assert_eq!(backoff, Duration::from_secs(3));
        assert_eq!(per_attempt, Duration::from_secs(39));
        assert!(per_attempt * MAX_RETRIES + backoff <= budget);
    }

    #[test]
    fn test_attempt_timeout_has_a_floor() {
        assert_eq!(attempt_timeout(Duration::from_secs(2)), MIN_ATTEMPT_TIMEOUT);
        assert_eq!(attempt_timeout(Duration::ZERO), MIN_ATTEMPT_TIMEOUT);
    }

    #[test]
    fn test_response_text_skips_non_text_blocks() {
        let response: LlmResponse = serde_json::from_value(serde_json::json!({
            "content": [
                { "type": "tool_use" },
                { "type": "text", "text": "Explain the borrow checker." }
            ],
            "usage": { "input_tokens": 10, "output_tokens": 5 }
        }))
        .unwrap();
        assert_eq!(response.text(), Some("Explain the borrow checker."));
    }
}
