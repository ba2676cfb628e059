//! Repository context detection
//!
//! Works out which GitHub repository the current checkout belongs to from
//! the `origin` remote.

use url::Url;

use crate::core::git::{GitRepository, LocalVcs};
use crate::error::{Result, ScribeError};

/// Repository context containing owner and repo name
#[derive(Debug, Clone)]
pub struct RepositoryContext {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
    /// Current branch name
    pub current_branch: String,
}

impl RepositoryContext {
    /// Detect repository context from an opened repository
    pub fn detect(git: &GitRepository) -> Result<Self> {
        let remote_url = git.origin_url()?;
        let (owner, name) = parse_github_url(&remote_url)?;
        let current_branch = git.current_branch()?;

        Ok(Self {
            owner,
            name,
            current_branch,
        })
    }

    /// Get the full repository name (owner/name)
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Parse a GitHub URL to extract owner and repository name
///
/// Supports both HTTPS and SSH URL formats:
/// - `https://github.com/owner/repo.git`
/// - `git@github.com:owner/repo.git`
/// - `ssh://git@github.com/owner/repo.git`
pub fn parse_github_url(url: &str) -> Result<(String, String)> {
    if let Some(path) = url.strip_prefix("git@github.com:") {
        return parse_owner_repo_path(path.trim_end_matches(".git"));
    }

    if let Some(path) = url.strip_prefix("ssh://git@github.com/") {
        return parse_owner_repo_path(path.trim_end_matches(".git"));
    }

    if let Ok(parsed) = Url::parse(url) {
        if parsed.host_str() == Some("github.com") {
            let path = parsed
                .path()
                .trim_start_matches('/')
                .trim_end_matches('/')
                .trim_end_matches(".git");
            return parse_owner_repo_path(path);
        }
    }

    Err(ScribeError::InvalidGitHubUrl(url.to_string()))
}

fn parse_owner_repo_path(path: &str) -> Result<(String, String)> {
    let mut parts = path.split('/');
    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ScribeError::InvalidGitHubUrl(path.to_string())),
    }
}
