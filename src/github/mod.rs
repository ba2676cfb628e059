//! GitHub API integration module
//!
//! This module provides the GitHub-side operations of pull request generation:
//! - Branch listing
//! - Branch comparison
//! - Issue listing
//! - Pull request creation
//! - Remote template lookup
//! - Error classification

pub mod branch;
pub mod client;
pub mod compare;
pub mod error_handler;
pub mod issues;
pub mod pull_request;
pub mod templates;

pub use branch::{BranchHandler, BranchInfo};
pub use client::{GitHubClient, RepositoryClient};
#[cfg(test)]
pub use client::MockRepositoryClient;
pub use compare::{BranchPair, DiffSummary};
pub use error_handler::{classify_github_error, open_browser};
pub use issues::IssueRef;
pub use pull_request::{CreatePullRequest, PullRequestRecord};
