//! LLM client with retry logic and a degraded mode
//!
//! When no API key is configured, or when a call fails after retries, the
//! client returns clearly labeled placeholder text instead of an error.
//! Consumers call the same interface in both modes; degraded output is
//! recognisable by its "Mock" / "Error" prefix.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

use crate::config::GenerationConfig;

/// One turn of a conversation. Roles other than "user" and "assistant" are
/// skipped during conversion, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role: "user" or "assistant"
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Convenience constructor for a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Convenience constructor for an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
enum CallError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("no text in response")]
    Empty,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationOptions,
}

#[derive(Clone, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationOptions {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

/// Generation backend client
pub struct GenerationClient {
    client: Client,
    config: GenerationConfig,
}

impl GenerationClient {
    /// Create a new client. Without an API key the client starts in
    /// degraded mode and every call yields placeholder text.
    pub fn new(config: &GenerationConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        if config.api_key.is_some() {
            tracing::info!("Generation backend configured with model {}", config.model);
        } else {
            tracing::warn!("No API key configured, generation backend runs in mock mode");
        }

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Whether a credential is configured. Informational only; callers use
    /// the same interface either way.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Generate text for a prompt, optionally prefixed with context.
    ///
    /// Never fails: unconfigured or failing backends produce labeled
    /// placeholder text.
    pub async fn generate(&self, prompt: &str, context: &str) -> String {
        let Some(api_key) = self.config.api_key.clone() else {
            return format!(
                "Mock response: {}... (generation backend not configured)",
                truncate_chars(prompt, 100)
            );
        };

        let full_prompt = if context.is_empty() {
            prompt.to_string()
        } else {
            format!("{}\n\n{}", context, prompt)
        };

        let contents = vec![Content {
            role: "user".to_string(),
            parts: vec![Part { text: full_prompt }],
        }];

        match self.call_with_retry(&api_key, contents).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Generation failed: {}", e);
                format!("Error generating response: {}", e)
            }
        }
    }

    /// Generate a reply to a conversation history.
    ///
    /// Messages with roles other than "user"/"assistant" are dropped.
    /// Never fails; degraded output is labeled like `generate`.
    pub async fn chat(&self, messages: &[ChatMessage]) -> String {
        let Some(api_key) = self.config.api_key.clone() else {
            return "Mock chat response (generation backend not configured)".to_string();
        };

        let contents = to_contents(messages);
        if contents.is_empty() {
            return "Error in chat response: no user or assistant messages in history".to_string();
        }

        match self.call_with_retry(&api_key, contents).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Chat generation failed: {}", e);
                format!("Error in chat response: {}", e)
            }
        }
    }

    async fn call_with_retry(
        &self,
        api_key: &str,
        contents: Vec<Content>,
    ) -> Result<String, CallError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.call_once(api_key, &contents).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.config.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Generation request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.config.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or(CallError::Empty))
    }

    async fn call_once(&self, api_key: &str, contents: &[Content]) -> Result<String, CallError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let request = GenerateRequest {
            contents: contents.to_vec(),
            generation_config: GenerationOptions {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CallError::Api { status, body });
        }

        let generate_response: GenerateResponse = response.json().await?;

        generate_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(CallError::Empty)
    }
}

/// Convert a history to API contents, mapping assistant turns to the
/// backend's "model" role and dropping anything else.
fn to_contents(messages: &[ChatMessage]) -> Vec<Content> {
    messages
        .iter()
        .filter_map(|m| {
            let role = match m.role.as_str() {
                "user" => "user",
                "assistant" => "model",
                other => {
                    tracing::debug!("Skipping chat message with role '{}'", other);
                    return None;
                }
            };
            Some(Content {
                role: role.to_string(),
                parts: vec![Part {
                    text: m.content.clone(),
                }],
            })
        })
        .collect()
}

/// First `max` characters of `text`, on char boundaries
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;

    fn unconfigured() -> GenerationClient {
        GenerationClient::new(&GenerationConfig::default())
    }

    #[tokio::test]
    async fn unconfigured_generate_returns_mock_marker() {
        let client = unconfigured();
        let out = client.generate("Explain photosynthesis", "").await;
        assert!(out.contains("Mock response"));
        assert!(out.contains("not configured"));
    }

    #[tokio::test]
    async fn unconfigured_chat_returns_mock_marker() {
        let client = unconfigured();
        let out = client.chat(&[ChatMessage::user("hi")]).await;
        assert!(out.contains("Mock chat response"));
    }

    #[test]
    fn unknown_roles_are_skipped_not_fatal() {
        let messages = vec![
            ChatMessage::user("question"),
            ChatMessage {
                role: "system".to_string(),
                content: "you are helpful".to_string(),
            },
            ChatMessage::assistant("answer"),
        ];
        let contents = to_contents(&messages);
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[1].role, "model");
    }

    #[test]
    fn long_prompts_are_truncated_in_mock_output() {
        let prompt = "x".repeat(500);
        let truncated = truncate_chars(&prompt, 100);
        assert_eq!(truncated.chars().count(), 100);
    }
}
