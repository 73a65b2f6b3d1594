//! OpenAI-compatible chat-completions client.
//!
//! One outbound request per stage: a system instruction plus a single
//! fully-interpolated user message, no streaming, no conversation memory.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CompletionConfig;

/// Request timeout for a single completion call. There is no retry; a
/// hung call is bounded only by this.
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("completion service credential is missing")]
    MissingCredential,

    #[error("cannot reach completion service at {0}")]
    Connection(String),

    #[error("completion request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("completion service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse completion response: {0}")]
    ResponseParsing(String),

    #[error("completion response contained no choices")]
    EmptyResponse,
}

/// Single-turn chat completion abstraction (allows mocking).
pub trait ChatClient {
    fn complete(&self, model: &str, system: &str, user: &str)
        -> Result<String, CompletionError>;
}

pub struct HttpChatClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl HttpChatClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, CompletionError> {
        if api_key.trim().is_empty() {
            return Err(CompletionError::MissingCredential);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CompletionError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn from_config(config: &CompletionConfig) -> Result<Self, CompletionError> {
        Self::new(&config.base_url, &config.api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl ChatClient for HttpChatClient {
    fn complete(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user,
        });

        let body = ChatCompletionRequest { model, messages };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    CompletionError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    CompletionError::Timeout(REQUEST_TIMEOUT_SECS)
                } else {
                    CompletionError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| CompletionError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(CompletionError::EmptyResponse)
    }
}

/// Mock chat client for testing — returns a configurable response.
pub struct MockChatClient {
    response: String,
}

impl MockChatClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl ChatClient for MockChatClient {
    fn complete(
        &self,
        _model: &str,
        _system: &str,
        _user: &str,
    ) -> Result<String, CompletionError> {
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_response() {
        let client = MockChatClient::new("the report");
        let result = client.complete("model", "system", "user").unwrap();
        assert_eq!(result, "the report");
    }

    #[test]
    fn constructor_trims_trailing_slash() {
        let client = HttpChatClient::new("https://api.groq.com/openai/v1/", "key").unwrap();
        assert_eq!(client.base_url(), "https://api.groq.com/openai/v1");
    }

    #[test]
    fn empty_credential_is_rejected() {
        assert!(matches!(
            HttpChatClient::new("https://api.groq.com/openai/v1", "   "),
            Err(CompletionError::MissingCredential)
        ));
    }

    #[test]
    fn request_serializes_system_then_user() {
        let body = ChatCompletionRequest {
            model: "llama-3.3-70b-versatile",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "instruction",
                },
                ChatMessage {
                    role: "user",
                    content: "query",
                },
            ],
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"model\":\"llama-3.3-70b-versatile\""));
        assert!(json.find("\"system\"").unwrap() < json.find("\"user\"").unwrap());
    }

    #[test]
    fn response_parses_first_choice() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, "hello");
    }
}
