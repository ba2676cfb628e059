//! CLI command definitions using clap
//!
//! Defines the command structure for the `scribe` CLI tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// scribe - AI-written commit messages and pull requests
///
/// Drafts commit messages from staged changes and pull request titles and
/// descriptions from branch diffs.
#[derive(Parser, Debug)]
#[command(name = "scribe", version, about, long_about = None)]
pub struct Cli {
    /// Output language for this run (en, zh-CN, ja, de, ...)
    #[arg(long, global = true, env = "SCRIBE_LANGUAGE")]
    pub language: Option<String>,

    /// Output style for this run
    #[arg(long, global = true, value_enum)]
    pub style: Option<StyleArg>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a commit message for the staged changes
    Commit(CommitArgs),

    /// Generate and open a pull request
    Pr(PrArgs),

    /// Inspect remote branches
    Branch(BranchArgs),

    /// Authenticate with GitHub
    Auth(AuthArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Verbosity of generated text
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    Simple,
    Normal,
    Detailed,
}

// ─────────────────────────────────────────────────────────────────────────────
// Commit Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Commit message generation
#[derive(Parser, Debug)]
pub struct CommitArgs {
    /// Write the message to this file instead of .git/SCRIBE_EDITMSG
    #[arg(short, long, conflicts_with = "print")]
    pub output: Option<PathBuf>,

    /// Only print the message
    #[arg(long)]
    pub print: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// PR Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Pull request generation
#[derive(Parser, Debug)]
pub struct PrArgs {
    /// Target branch (skips the base branch menu)
    #[arg(long)]
    pub base: Option<String>,

    /// Source branch (skips the compare branch menu)
    #[arg(long)]
    pub head: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Branch Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Branch commands
#[derive(Parser, Debug)]
pub struct BranchArgs {
    #[command(subcommand)]
    pub command: BranchCommand,
}

#[derive(Subcommand, Debug)]
pub enum BranchCommand {
    /// List remote branches
    List,
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Authentication commands
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Store a GitHub Personal Access Token
    Login,
    /// Remove the stored token
    Logout,
    /// Show which credentials are configured
    Status,
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration commands
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key
        key: ConfigKey,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: ConfigKey,
    },

    /// Reset a configuration value
    Remove {
        /// Configuration key
        key: ConfigKey,
    },
}

/// Available configuration keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// Gemini API key (stored in the keyring)
    #[value(name = "gemini-key")]
    GeminiKey,

    /// OpenAI API key (stored in the keyring)
    #[value(name = "openai-key")]
    OpenAiKey,

    /// Completion provider: gemini or openai
    Provider,

    /// Model for the selected provider
    Model,

    /// Output language code
    Language,

    /// Output style: simple, normal or detailed
    Style,

    /// Base URL of an OpenAI-compatible endpoint
    #[value(name = "openai-base-url")]
    OpenAiBaseUrl,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli = Cli::parse_from(["scribe", "commit", "--language", "ja", "--style", "simple"]);
        assert_eq!(cli.language.as_deref(), Some("ja"));
        assert_eq!(cli.style, Some(StyleArg::Simple));
        assert!(matches!(cli.command, Commands::Commit(_)));
    }

    #[test]
    fn test_pr_branch_flags() {
        let cli = Cli::parse_from(["scribe", "pr", "--base", "main", "--head", "feature/x"]);
        match cli.command {
            Commands::Pr(args) => {
                assert_eq!(args.base.as_deref(), Some("main"));
                assert_eq!(args.head.as_deref(), Some("feature/x"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_output_conflicts_with_print() {
        let result = Cli::try_parse_from(["scribe", "commit", "--print", "--output", "msg.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_keys_parse() {
        let cli = Cli::parse_from(["scribe", "config", "set", "openai-base-url", "http://localhost:8080/v1"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                command: ConfigCommand::Set { key, value },
            }) => {
                assert_eq!(key, ConfigKey::OpenAiBaseUrl);
                assert_eq!(value, "http://localhost:8080/v1");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
