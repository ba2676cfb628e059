//! Issue lookups for linking a pull request to the issue it resolves

use std::collections::BTreeSet;

use octocrab::models::issues::Issue;
use octocrab::params::State;

use crate::error::Result;
use crate::github::client::GitHubClient;

/// An open issue a pull request can resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub number: u64,
    pub title: String,
    pub labels: BTreeSet<String>,
}

impl IssueRef {
    /// One-line label for selection menus
    pub fn menu_label(&self) -> String {
        if self.labels.is_empty() {
            format!("#{} {}", self.number, self.title)
        } else {
            let labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();
            format!("#{} {} [{}]", self.number, self.title, labels.join(", "))
        }
    }
}

impl From<Issue> for IssueRef {
    fn from(issue: Issue) -> Self {
        Self {
            number: issue.number,
            title: issue.title,
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
        }
    }
}

/// Issue operations handler
pub struct IssueHandler<'a> {
    client: &'a GitHubClient,
}

impl<'a> IssueHandler<'a> {
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// List open issues, most recently updated first
    pub async fn list_open(&self) -> Result<Vec<IssueRef>> {
        let first_page = self
            .client
            .issues()
            .list()
            .state(State::Open)
            .sort(octocrab::params::issues::Sort::Updated)
            .per_page(100)
            .send()
            .await?;
        let issues = self.client.octocrab().all_pages(first_page).await?;

        Ok(open_issue_refs(issues))
    }
}

/// The issues endpoint also returns pull requests; keep only real issues
fn open_issue_refs(issues: Vec<Issue>) -> Vec<IssueRef> {
    issues
        .into_iter()
        .filter(|issue| issue.pull_request.is_none())
        .map(IssueRef::from)
        .collect()
}
