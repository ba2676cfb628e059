//! Gemini API client

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::ai::api_error::{classify_status, extract_api_error};
use crate::ai::{CompletionClient, StyleBudget};
use crate::core::config::{Config, GeminiModel, Provider};
use crate::core::credentials::CredentialStore;
use crate::error::{AiErrorKind, Result, ScribeError};

/// Gemini API base URL
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const PROVIDER: &str = "Gemini";

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    api_key: SecretString,
    model: GeminiModel,
}

impl GeminiClient {
    /// Create a new Gemini client from the configured model and stored key
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = CredentialStore::require_provider_key(Provider::Gemini)?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: config.gemini_model,
        })
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn describe(&self) -> String {
        format!("{} ({})", PROVIDER, self.model.display_name())
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, system: &str, user: &str, budget: StyleBudget) -> Result<String> {
        let url = format!("{}/{}:generateContent", GEMINI_API_BASE, self.model.api_name());
        let request_body = GeminiRequest::new(system, user, budget);

        debug!(
            prompt_chars = user.len(),
            max_tokens = budget.max_output_tokens,
            "sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request_body)
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

        let parsed: GeminiResponse = serde_json::from_str(&payload).map_err(|e| {
            ScribeError::ai(
                PROVIDER,
                AiErrorKind::Malformed,
                format!("Failed to parse response: {}", e),
            )
        })?;

        parsed.into_text().ok_or_else(|| {
            ScribeError::ai(PROVIDER, AiErrorKind::Malformed, "Empty response from API")
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gemini API Request/Response types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl GeminiRequest {
    fn new(system: &str, user: &str, budget: StyleBudget) -> Self {
        Self {
            system_instruction: Content::text(None, system),
            contents: vec![Content::text(Some("user"), user)],
            generation_config: GenerationConfig {
                temperature: budget.temperature,
                max_output_tokens: budget.max_output_tokens,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate, if it has any
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}
