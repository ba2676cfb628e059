//! OpenAI-compatible chat completions client

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::ai::api_error::{classify_status, extract_api_error};
use crate::ai::{CompletionClient, StyleBudget};
use crate::core::config::{Config, Provider};
use crate::core::credentials::CredentialStore;
use crate::error::{AiErrorKind, Result, ScribeError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Overrides the configured base URL
const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

const PROVIDER: &str = "OpenAI";

/// Client for `POST {base}/chat/completions`
pub struct OpenAiClient {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = CredentialStore::require_provider_key(Provider::OpenAi)?;
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| config.openai_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client: Client::new(),
            api_key,
            model: config.openai_model.clone(),
            base_url,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn describe(&self) -> String {
        format!("{} ({})", PROVIDER, self.model)
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, system: &str, user: &str, budget: StyleBudget) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: budget.temperature,
            max_tokens: budget.max_output_tokens,
        };

        debug!(endpoint = %self.endpoint(), prompt_chars = user.len(), "sending completion request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ScribeError::ai(PROVIDER, AiErrorKind::Network, e.to_string()))?;

        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|e| ScribeError::ai(PROVIDER, AiErrorKind::Network, e.to_string()))?;
        debug!(%status, "completion response received");

        if !status.is_success() {
            return Err(ScribeError::ai(
                PROVIDER,
                classify_status(status, &payload),
                format!("API error ({}): {}", status, extract_api_error(&payload)),
            ));
        }

        let parsed: ChatResponse = serde_json::from_str(&payload).map_err(|e| {
            ScribeError::ai(
                PROVIDER,
                AiErrorKind::Malformed,
                format!("Failed to parse response: {}", e),
            )
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                ScribeError::ai(PROVIDER, AiErrorKind::Malformed, "Empty response from API")
            })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> OpenAiClient {
        OpenAiClient {
            client: Client::new(),
            api_key: SecretString::from("sk-test".to_string()),
            model: "gpt-4o-mini".to_string(),
            base_url: base_url.to_string(),
        }
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        assert_eq!(
            client("http://localhost:11434/v1/").endpoint(),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(
            client(DEFAULT_BASE_URL).endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "usr",
                },
            ],
            temperature: 0.5,
            max_tokens: 2048,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "usr");
        assert_eq!(json["max_tokens"], 2048);
    }

    #[test]
    fn test_response_content() {
        let payload = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"fix: y"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("fix: y")
        );
    }
}
