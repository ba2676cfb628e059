//! Secure credential storage using the system keyring
//!
//! Stores the GitHub token and the completion provider API keys in the
//! system keyring (macOS Keychain, Linux Secret Service) with an in-memory
//! cache to minimize keychain prompts.
//!
//! ## Environment Variable Fallback
//!
//! For development and CI, credentials can be set via environment variables:
//! - `GITHUB_TOKEN` - GitHub personal access token
//! - `GEMINI_API_KEY` - Gemini API key
//! - `OPENAI_API_KEY` - OpenAI API key
//!
//! Priority: env var > cache > keyring

use std::collections::HashMap;
use std::sync::RwLock;

use keyring::Entry;
use once_cell::sync::Lazy;
use secrecy::{ExposeSecret, SecretString};

use crate::core::config::Provider;
use crate::error::{Result, ScribeError};

const SERVICE_NAME: &str = "scribe-rs";

/// A stored secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    GitHubToken,
    GeminiKey,
    OpenAiKey,
}

impl CredentialKind {
    /// Keyring entry name
    fn entry_name(&self) -> &'static str {
        match self {
            CredentialKind::GitHubToken => "github_token",
            CredentialKind::GeminiKey => "gemini_api_key",
            CredentialKind::OpenAiKey => "openai_api_key",
        }
    }

    /// Environment variable that overrides the keyring
    pub fn env_var(&self) -> &'static str {
        match self {
            CredentialKind::GitHubToken => "GITHUB_TOKEN",
            CredentialKind::GeminiKey => "GEMINI_API_KEY",
            CredentialKind::OpenAiKey => "OPENAI_API_KEY",
        }
    }

    /// API key credential for a completion provider
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::Gemini => CredentialKind::GeminiKey,
            Provider::OpenAi => CredentialKind::OpenAiKey,
        }
    }
}

// Missing key = not yet fetched, Some(None) = fetched and absent
static CACHE: Lazy<RwLock<HashMap<CredentialKind, Option<SecretString>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Credential store for secure token management
pub struct CredentialStore;

impl CredentialStore {
    /// Store a credential securely
    ///
    /// Updates both the keyring and the in-memory cache.
    pub fn store(kind: CredentialKind, value: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, kind.entry_name())?;
        entry.set_password(value)?;

        if let Ok(mut cache) = CACHE.write() {
            cache.insert(kind, Some(SecretString::from(value.to_string())));
        }

        Ok(())
    }

    /// Retrieve a credential
    ///
    /// Priority: environment variable > cache > keyring
    pub fn get(kind: CredentialKind) -> Result<Option<SecretString>> {
        if let Ok(value) = std::env::var(kind.env_var()) {
            if !value.is_empty() {
                return Ok(Some(SecretString::from(value)));
            }
        }

        if let Ok(cache) = CACHE.read() {
            if let Some(cached) = cache.get(&kind) {
                return Ok(cached.clone());
            }
        }

        let result = Self::fetch_from_keyring(kind)?;

        if let Ok(mut cache) = CACHE.write() {
            cache.insert(kind, result.clone());
        }

        Ok(result)
    }

    fn fetch_from_keyring(kind: CredentialKind) -> Result<Option<SecretString>> {
        let entry = Entry::new(SERVICE_NAME, kind.entry_name())?;
        match entry.get_password() {
            Ok(password) => Ok(Some(SecretString::from(password))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ScribeError::Credential(format!(
                "Cannot access system keychain. Make sure your keyring is unlocked. ({})",
                e
            ))),
        }
    }

    /// Delete a stored credential
    ///
    /// Clears both the keyring and the in-memory cache.
    pub fn delete(kind: CredentialKind) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, kind.entry_name())?;
        let result = match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ScribeError::Credential(e.to_string())),
        };

        if let Ok(mut cache) = CACHE.write() {
            cache.insert(kind, None);
        }

        result
    }

    /// Check if a credential is available
    pub fn has(kind: CredentialKind) -> Result<bool> {
        Ok(Self::get(kind)?.is_some())
    }

    /// Get the GitHub token, returning an error if not authenticated
    pub fn require_github_token() -> Result<SecretString> {
        Self::get(CredentialKind::GitHubToken)?.ok_or(ScribeError::NotAuthenticated)
    }

    /// Get the API key of a completion provider, returning an error if not configured
    pub fn require_provider_key(provider: Provider) -> Result<SecretString> {
        let kind = CredentialKind::for_provider(provider);
        Self::get(kind)?.ok_or(ScribeError::AiKeyMissing {
            provider: provider.display_name(),
            config_key: match provider {
                Provider::Gemini => "gemini-key",
                Provider::OpenAi => "openai-key",
            },
            env_var: kind.env_var(),
        })
    }

    /// Get a masked version of a token for display (shows first 4 and last 4 chars)
    pub fn mask_token(token: &SecretString) -> String {
        let exposed = token.expose_secret();
        if exposed.chars().count() <= 8 {
            "*".repeat(exposed.chars().count())
        } else {
            let head: String = exposed.chars().take(4).collect();
            let tail: String = exposed
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("{}...{}", head, tail)
        }
    }
}
