//! scribe-rs - AI-written commit messages and pull requests
//!
//! Available as the `scribe` command.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scribe_rs::cli::commands::{Cli, Commands};
use scribe_rs::cli::{auth, branch, commit, config, pr, Overrides};
use scribe_rs::core::git::GitRepository;
use scribe_rs::error::{Result, ScribeError};

#[tokio::main]
async fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        if e.is_silent() {
            return;
        }
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let overrides = Overrides::from_cli(&cli);

    match cli.command {
        // Auth and config work outside a repository
        Commands::Auth(args) => auth::handle_auth(args.command).await,
        Commands::Config(args) => config::handle_config(args.command),

        command => {
            ensure_git_repository()?;

            match command {
                Commands::Commit(args) => commit::handle_commit(args, &overrides).await,
                Commands::Pr(args) => pr::handle_pr(args, &overrides).await,
                Commands::Branch(args) => branch::handle_branch(args.command).await,
                Commands::Auth(_) | Commands::Config(_) => unreachable!(),
            }
        }
    }
}

/// Ensure we're in a git repository
fn ensure_git_repository() -> Result<()> {
    if !GitRepository::is_git_repository() {
        return Err(ScribeError::NotGitRepository);
    }
    Ok(())
}
