//! Pull request creation

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, ScribeError};
use crate::github::client::GitHubClient;

/// Parameters for creating a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePullRequest {
    /// Base branch (target branch to merge into)
    pub base: String,
    /// Compare branch (source branch with changes)
    pub compare: String,
    /// PR title
    pub title: String,
    /// Generated PR body, without the issue reference
    pub body: String,
    /// Issue the PR resolves
    pub issue_number: Option<u64>,
    /// Create as draft
    pub draft: bool,
}

impl CreatePullRequest {
    /// Body as sent to GitHub: the generated body plus the issue reference
    pub fn final_body(&self) -> String {
        let Some(number) = self.issue_number else {
            return self.body.clone();
        };

        let reference = format!("Resolves #{}", number);
        if self.body.trim_end().ends_with(&reference) {
            self.body.clone()
        } else if self.body.trim().is_empty() {
            reference
        } else {
            format!("{}\n\n{}", self.body.trim_end(), reference)
        }
    }

    /// Markdown shown to the user before anything is published
    pub fn preview_markdown(&self) -> String {
        format!("{}\n\n---\n\n{}", self.title, self.final_body())
    }
}

/// A pull request created on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRecord {
    pub number: u64,
    pub html_url: String,
    pub draft: bool,
}

#[derive(Debug, Serialize)]
struct CreatePullBody<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    body: &'a str,
    draft: bool,
}

#[derive(Debug, Deserialize)]
struct CreatedPull {
    number: Option<u64>,
    html_url: Option<String>,
    #[serde(default)]
    draft: Option<bool>,
}

impl CreatedPull {
    /// Validate the response; a missing number means the create failed
    fn into_record(self, fallback_url_base: &str, requested_draft: bool) -> Result<PullRequestRecord> {
        let number = self.number.ok_or(ScribeError::MissingPullRequestNumber)?;
        Ok(PullRequestRecord {
            number,
            html_url: self
                .html_url
                .unwrap_or_else(|| format!("{}/pull/{}", fallback_url_base, number)),
            draft: self.draft.unwrap_or(requested_draft),
        })
    }
}

/// Pull request operations handler
pub struct PullRequestHandler<'a> {
    client: &'a GitHubClient,
}

impl<'a> PullRequestHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Create a new pull request
    pub async fn create(&self, request: &CreatePullRequest) -> Result<PullRequestRecord> {
        // GitHub API: POST /repos/{owner}/{repo}/pulls
        let route = format!("/repos/{}/{}/pulls", self.client.owner, self.client.repo);
        let body = request.final_body();
        let payload = CreatePullBody {
            title: &request.title,
            head: &request.compare,
            base: &request.base,
            body: &body,
            draft: request.draft,
        };

        let created: CreatedPull = self.client.octocrab().post(&route, Some(&payload)).await?;
        let record = created.into_record(&self.client.html_url(), request.draft)?;

        info!(number = record.number, draft = record.draft, "pull request created");
        Ok(record)
    }
}
