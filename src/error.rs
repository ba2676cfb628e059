//! Custom error types for scribe-rs
//!
//! User-friendly error messages for all failure scenarios.

use std::fmt;

use thiserror::Error;

/// Classification of a failed completion request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiErrorKind {
    /// Key rejected or missing permissions
    Auth,
    /// Provider quota or rate limit hit
    RateLimit,
    /// Request never completed or the provider is unavailable
    Network,
    /// Provider answered with something we cannot use
    Malformed,
}

impl fmt::Display for AiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hint = match self {
            AiErrorKind::Auth => "the API key was rejected",
            AiErrorKind::RateLimit => "rate limit reached, wait a moment and retry",
            AiErrorKind::Network => "the provider could not be reached",
            AiErrorKind::Malformed => "the provider returned an unusable response",
        };
        f.write_str(hint)
    }
}

/// Main error type for the scribe-rs application
#[derive(Error, Debug)]
pub enum ScribeError {
    /// Not running in a git repository
    #[error("This directory is not a git repository.\n\n  → Run 'git init' to create one, or navigate to an existing git project.")]
    NotGitRepository,

    /// No GitHub remote found
    #[error("No GitHub remote found in this repository.\n\n  → Make sure 'origin' points to a GitHub URL.\n  → Run 'git remote -v' to check your remotes.")]
    NoGitHubRemote,

    /// Invalid GitHub URL format
    #[error("Cannot parse GitHub URL: {0}\n\n  → Expected format: https://github.com/owner/repo or git@github.com:owner/repo")]
    InvalidGitHubUrl(String),

    /// No GitHub token available
    #[error("You are not logged in to GitHub.\n\n  → Run 'scribe auth login' or set GITHUB_TOKEN.")]
    NotAuthenticated,

    /// Token validation failed during login
    #[error("GitHub authentication failed: {0}\n\n  → Try running 'scribe auth login' again.")]
    AuthenticationFailed(String),

    /// GitHub API error (network, permissions, unexpected responses)
    #[error("GitHub API request failed: {0}\n\n  → Check your internet connection.\n  → Your token may lack the 'repo' scope - try 'scribe auth logout' then 'scribe auth login'.")]
    GitHubApi(String),

    /// GitHub rejected the request contents
    #[error("GitHub rejected the request: {0}")]
    GitHubValidation(String),

    /// The repository cannot host draft pull requests
    #[error("Draft pull requests are not supported for this repository: {0}")]
    DraftUnsupported(String),

    /// GitHub accepted the create call but returned no pull request number
    #[error("GitHub did not return a pull request number.\n\n  → Check the repository on GitHub before retrying.")]
    MissingPullRequestNumber,

    /// No file differs between the chosen branches
    #[error("No changes between '{base}' and '{compare}'.\n\n  → Push your commits to '{compare}' before opening a pull request.")]
    EmptyChangeSet { base: String, compare: String },

    /// Working tree and index are both clean
    #[error("Nothing to commit. Working tree is clean.")]
    NothingToCommit,

    /// Another pull request run holds the run gate
    #[error("A pull request generation is already running.")]
    RunInProgress,

    /// Preview could not be shown or torn down
    #[error("Could not show the preview: {0}\n\n  → Nothing was published.")]
    PreviewFailed(String),

    /// Git operation error
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    /// Credential storage error
    #[error("Cannot access secure storage: {0}\n\n  → On macOS: Make sure Keychain Access is available.\n  → On Linux: Ensure a secret service (like gnome-keyring) is running.")]
    Credential(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// Network request error
    #[error("Network request failed: {0}\n\n  → Check your internet connection.")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization/deserialization error
    #[error("Configuration file is invalid: {0}")]
    Toml(String),

    /// Completion provider error
    #[error("AI generation failed ({provider}): {kind}.\n  {message}")]
    AiApi {
        provider: &'static str,
        kind: AiErrorKind,
        message: String,
    },

    /// Completion provider key missing
    #[error("{provider} API key is not set up.\n\n  → Run 'scribe config set {config_key} YOUR_KEY' or export {env_var}.")]
    AiKeyMissing {
        provider: &'static str,
        config_key: &'static str,
        env_var: &'static str,
    },

    /// Invalid input from user
    #[error("{0}")]
    InvalidInput(String),

    /// Operation cancelled by user
    #[error("Operation cancelled.")]
    Cancelled,
}

impl ScribeError {
    /// Build a completion error for the given provider
    pub fn ai(provider: &'static str, kind: AiErrorKind, message: impl Into<String>) -> Self {
        ScribeError::AiApi {
            provider,
            kind,
            message: message.into(),
        }
    }

    /// Errors that end a run without any message to the user
    pub fn is_silent(&self) -> bool {
        matches!(self, ScribeError::Cancelled)
    }
}

impl From<keyring::Error> for ScribeError {
    fn from(err: keyring::Error) -> Self {
        ScribeError::Credential(err.to_string())
    }
}

impl From<toml::de::Error> for ScribeError {
    fn from(err: toml::de::Error) -> Self {
        ScribeError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for ScribeError {
    fn from(err: toml::ser::Error) -> Self {
        ScribeError::Toml(err.to_string())
    }
}

impl From<octocrab::Error> for ScribeError {
    fn from(err: octocrab::Error) -> Self {
        crate::github::error_handler::classify_github_error(err)
    }
}

/// Result type alias using ScribeError
pub type Result<T> = std::result::Result<T, ScribeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_is_silent() {
        assert!(ScribeError::Cancelled.is_silent());
        assert!(!ScribeError::NothingToCommit.is_silent());
    }

    #[test]
    fn test_empty_change_set_names_both_branches() {
        let err = ScribeError::EmptyChangeSet {
            base: "main".to_string(),
            compare: "feature/x".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("No changes between 'main' and 'feature/x'"));
    }

    #[test]
    fn test_ai_error_includes_provider_and_kind() {
        let err = ScribeError::ai("Gemini", AiErrorKind::RateLimit, "429 Too Many Requests");
        let msg = err.to_string();
        assert!(msg.contains("Gemini"));
        assert!(msg.contains("rate limit"));
        assert!(msg.contains("429"));
    }
}
