//! GitHub API client wrapper using octocrab

use async_trait::async_trait;
use octocrab::Octocrab;
use secrecy::ExposeSecret;

use crate::core::credentials::CredentialStore;
use crate::error::Result;
use crate::github::branch::{BranchHandler, BranchInfo};
use crate::github::compare::{BranchPair, CompareHandler, DiffSummary};
use crate::github::issues::{IssueHandler, IssueRef};
use crate::github::pull_request::{CreatePullRequest, PullRequestHandler, PullRequestRecord};
use crate::github::templates::TemplateHandler;

/// Remote repository operations the pull request generator depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Remote branches, default branch first
    async fn list_branches(&self) -> Result<Vec<BranchInfo>>;

    /// Open issues (pull requests excluded)
    async fn list_open_issues(&self) -> Result<Vec<IssueRef>>;

    /// Files and patch text that `compare` adds on top of `base`
    async fn diff(&self, branches: &BranchPair) -> Result<DiffSummary>;

    /// Open a pull request
    async fn create_pull_request(&self, request: &CreatePullRequest) -> Result<PullRequestRecord>;

    /// Pull request template stored on the base branch
    async fn pull_request_template(&self, base: &str) -> Result<Option<String>>;
}

/// GitHub API client wrapper
pub struct GitHubClient {
    /// The octocrab instance
    inner: Octocrab,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl GitHubClient {
    /// Create a new GitHub client for the given repository
    ///
    /// The token comes from `GITHUB_TOKEN` or the keyring.
    pub fn new(owner: String, repo: String) -> Result<Self> {
        let token = CredentialStore::require_github_token()?;

        let octocrab = Octocrab::builder()
            .personal_token(token.expose_secret().to_string())
            .build()?;

        Ok(Self {
            inner: octocrab,
            owner,
            repo,
        })
    }

    /// Get the inner octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.inner
    }

    /// Get issues handler for this repository
    pub fn issues(&self) -> octocrab::issues::IssueHandler<'_> {
        self.inner.issues(&self.owner, &self.repo)
    }

    /// Get repos handler for this repository
    pub fn repos(&self) -> octocrab::repos::RepoHandler<'_> {
        self.inner.repos(&self.owner, &self.repo)
    }

    /// Web URL of the repository
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    async fn list_branches(&self) -> Result<Vec<BranchInfo>> {
        BranchHandler::new(self).list().await
    }

    async fn list_open_issues(&self) -> Result<Vec<IssueRef>> {
        IssueHandler::new(self).list_open().await
    }

    async fn diff(&self, branches: &BranchPair) -> Result<DiffSummary> {
        CompareHandler::new(self).diff(branches).await
    }

    async fn create_pull_request(&self, request: &CreatePullRequest) -> Result<PullRequestRecord> {
        PullRequestHandler::new(self).create(request).await
    }

    async fn pull_request_template(&self, base: &str) -> Result<Option<String>> {
        Ok(TemplateHandler::new(self).pull_request_template(base).await)
    }
}
