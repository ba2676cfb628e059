//! Branch CLI command handlers

use crate::cli::commands::BranchCommand;
use crate::core::git::GitRepository;
use crate::core::repository::RepositoryContext;
use crate::error::Result;
use crate::github::{BranchInfo, GitHubClient, RepositoryClient};

/// Handle branch commands
pub async fn handle_branch(command: BranchCommand) -> Result<()> {
    match command {
        BranchCommand::List => handle_list().await,
    }
}

async fn handle_list() -> Result<()> {
    let git = GitRepository::open_current_dir()?;
    let repo_ctx = RepositoryContext::detect(&git)?;
    let client = GitHubClient::new(repo_ctx.owner.clone(), repo_ctx.name.clone())?;

    let branches = client.list_branches().await?;

    if branches.is_empty() {
        println!("No remote branches found.");
        return Ok(());
    }

    println!("Remote branches for {}:\n", repo_ctx.full_name());
    for branch in &branches {
        println!("  {}", branch_line(branch, &repo_ctx.current_branch));
    }

    Ok(())
}

fn branch_line(branch: &BranchInfo, current: &str) -> String {
    let default_marker = if branch.is_default { " (default)" } else { "" };
    let protected_marker = if branch.protected { " 🔒" } else { "" };
    let current_marker = if branch.name == current { " ←" } else { "" };
    format!(
        "{}{}{}{}",
        branch.name, default_marker, protected_marker, current_marker
    )
}
