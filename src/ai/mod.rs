//! AI integration module
//!
//! This module talks to text-completion providers to draft:
//! - Commit messages
//! - PR titles and descriptions

mod api_error;
pub mod diff;
pub mod gemini;
pub mod openai;
pub mod parse;
pub mod prompts;

use async_trait::async_trait;

use crate::core::config::{Config, Provider};
use crate::error::{AiErrorKind, Result, ScribeError};

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use prompts::{PromptPair, PromptSettings};

/// Output limits handed to the provider for one completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleBudget {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// Generated PR content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedContent {
    /// PR title
    pub title: String,
    /// PR body/description
    pub body: String,
}

/// A text-completion endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Provider name used in messages and errors
    fn provider_name(&self) -> &'static str;

    /// "Provider (model)" label shown before a request
    fn describe(&self) -> String;

    /// Send a system + user prompt pair and return the generated text
    async fn complete(&self, system: &str, user: &str, budget: StyleBudget) -> Result<String>;
}

/// Build the completion client selected in the configuration
pub fn client_from_config(config: &Config) -> Result<Box<dyn CompletionClient>> {
    Ok(match config.provider {
        Provider::Gemini => Box::new(GeminiClient::new(config)?),
        Provider::OpenAi => Box::new(OpenAiClient::new(config)?),
    })
}

/// Generate a commit message
pub async fn generate_commit_message(
    client: &dyn CompletionClient,
    prompt: &PromptPair,
    budget: StyleBudget,
) -> Result<String> {
    let response = client.complete(&prompt.system, &prompt.user, budget).await?;
    let message = parse::clean_commit_message(&response);

    if message.is_empty() {
        return Err(ScribeError::ai(
            client.provider_name(),
            AiErrorKind::Malformed,
            "generated commit message is empty",
        ));
    }

    Ok(message)
}

/// Generate a PR title and body
pub async fn generate_pr_content(
    client: &dyn CompletionClient,
    prompt: &PromptPair,
    budget: StyleBudget,
) -> Result<GeneratedContent> {
    let response = client.complete(&prompt.system, &prompt.user, budget).await?;
    parse::parse_pr_content(client.provider_name(), &response)
}
