//! Pull request generation run
//!
//! One run walks the user from branch selection to a created pull request:
//! branches, optional issue, diff, generated title/body, preview, draft or
//! regular, a last look at the diff, creation. The preview is cleared on
//! every way out of the run.

use once_cell::sync::Lazy;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::ai::{generate_pr_content, prompts::pr_prompts, CompletionClient, GeneratedContent, PromptSettings};
use crate::core::git::{LocalVcs, TemplateKind};
use crate::error::{Result, ScribeError};
use crate::github::{
    BranchInfo, BranchPair, CreatePullRequest, DiffSummary, IssueRef, PullRequestRecord,
    RepositoryClient,
};
use crate::interaction::Interaction;
use crate::preview::PreviewSlot;

/// Only one pull request run per process
static PR_RUN_GATE: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const PR_TYPES: [&str; 2] = ["Draft", "Regular"];

/// Branches given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrOptions {
    pub base: Option<String>,
    pub compare: Option<String>,
}

/// How a run ended when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrOutcome {
    Created {
        record: PullRequestRecord,
        /// A draft was requested but the repository only accepted a regular PR
        fell_back_to_regular: bool,
    },
    Cancelled,
}

/// Drives a pull request run against its collaborators
pub struct PrGenerator<'a> {
    repository: &'a dyn RepositoryClient,
    completion: &'a dyn CompletionClient,
    vcs: &'a dyn LocalVcs,
    ui: &'a dyn Interaction,
    settings: PromptSettings,
    gate: &'a Mutex<()>,
}

impl<'a> PrGenerator<'a> {
    pub fn new(
        repository: &'a dyn RepositoryClient,
        completion: &'a dyn CompletionClient,
        vcs: &'a dyn LocalVcs,
        ui: &'a dyn Interaction,
        settings: PromptSettings,
    ) -> Self {
        Self {
            repository,
            completion,
            vcs,
            ui,
            settings,
            gate: &PR_RUN_GATE,
        }
    }

    /// Guard runs with `gate` instead of the process-wide one
    pub fn with_gate(mut self, gate: &'a Mutex<()>) -> Self {
        self.gate = gate;
        self
    }

    /// Run once. `preview` is empty again when this returns.
    pub async fn run(&self, preview: &mut PreviewSlot, options: &PrOptions) -> Result<PrOutcome> {
        let _running = self
            .gate
            .try_lock()
            .map_err(|_| ScribeError::RunInProgress)?;

        let result = self.run_steps(preview, options).await;

        if let Err(e) = preview.clear() {
            warn!(error = %e, "preview cleanup failed");
            self.ui.warn(&format!("Could not remove the preview: {}", e));
        }

        match result {
            Ok((record, fell_back_to_regular)) => {
                self.finish(&record);
                Ok(PrOutcome::Created {
                    record,
                    fell_back_to_regular,
                })
            }
            Err(ScribeError::Cancelled) => {
                debug!("pull request run cancelled");
                Ok(PrOutcome::Cancelled)
            }
            Err(e) => Err(e),
        }
    }

    async fn run_steps(
        &self,
        preview: &mut PreviewSlot,
        options: &PrOptions,
    ) -> Result<(PullRequestRecord, bool)> {
        let branches = self.select_branches(options).await?;
        let issue = self.select_issue().await;

        let diff = self.repository.diff(&branches).await?;
        debug!(files = diff.files.len(), "fetched branch diff");

        let content = self.generate(&branches, &diff).await?;

        let mut request = CreatePullRequest {
            base: branches.base.clone(),
            compare: branches.compare.clone(),
            title: content.title,
            body: content.body,
            issue_number: issue.map(|i| i.number),
            draft: false,
        };
        preview.show(&request.preview_markdown())?;

        request.draft = self.select_pr_type()?;
        self.validate(&branches).await?;
        self.create(&request).await
    }

    async fn select_branches(&self, options: &PrOptions) -> Result<BranchPair> {
        if let (Some(base), Some(compare)) = (&options.base, &options.compare) {
            return branch_pair(base.clone(), compare.clone());
        }

        let branches = self.repository.list_branches().await?;
        if branches.is_empty() {
            return Err(ScribeError::InvalidInput(
                "The remote repository has no branches".to_string(),
            ));
        }

        let base = match &options.base {
            Some(base) => base.clone(),
            None => {
                let labels: Vec<String> = branches.iter().map(branch_label).collect();
                let index = self
                    .ui
                    .select("Base branch (merge into):", &labels)
                    .ok_or(ScribeError::Cancelled)?;
                branches
                    .get(index)
                    .map(|b| b.name.clone())
                    .ok_or(ScribeError::Cancelled)?
            }
        };

        let compare = match &options.compare {
            Some(compare) => compare.clone(),
            None => {
                let current = self.vcs.current_branch().ok();
                let candidates = compare_candidates(&branches, &base, current.as_deref());
                if candidates.is_empty() {
                    return Err(ScribeError::InvalidInput(format!(
                        "No other branch to compare against '{}'",
                        base
                    )));
                }
                let index = self
                    .ui
                    .select("Compare branch (changes from):", &candidates)
                    .ok_or(ScribeError::Cancelled)?;
                candidates.get(index).cloned().ok_or(ScribeError::Cancelled)?
            }
        };

        branch_pair(base, compare)
    }

    /// Optional issue to link; skipping or a failed lookup leaves it unlinked
    async fn select_issue(&self) -> Option<IssueRef> {
        let issues = match self.repository.list_open_issues().await {
            Ok(issues) => issues,
            Err(e) => {
                warn!(error = %e, "could not list open issues");
                self.ui
                    .warn(&format!("Could not load open issues, continuing without one: {}", e));
                return None;
            }
        };
        if issues.is_empty() {
            return None;
        }

        let labels: Vec<String> = issues.iter().map(IssueRef::menu_label).collect();
        let index = self
            .ui
            .select("Link an issue (Enter to skip):", &labels)?;
        issues.into_iter().nth(index)
    }

    async fn generate(&self, branches: &BranchPair, diff: &DiffSummary) -> Result<GeneratedContent> {
        let template = self.pull_request_template(&branches.base).await;

        self.ui.info(&format!(
            "Generating pull request with {}...",
            self.completion.describe()
        ));
        let prompt = pr_prompts(diff, branches, self.settings, template.as_deref());
        generate_pr_content(self.completion, &prompt, self.settings.style.budget()).await
    }

    /// Local template first, then the one on the base branch
    async fn pull_request_template(&self, base: &str) -> Option<String> {
        match self.vcs.discover_template(TemplateKind::PullRequest) {
            Ok(Some(template)) => return Some(template),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "could not read local pull request template"),
        }

        match self.repository.pull_request_template(base).await {
            Ok(template) => template,
            Err(e) => {
                debug!(error = %e, "remote pull request template unavailable");
                None
            }
        }
    }

    fn select_pr_type(&self) -> Result<bool> {
        let options: Vec<String> = PR_TYPES.iter().map(|s| s.to_string()).collect();
        match self.ui.select("Pull request type:", &options) {
            Some(0) => Ok(true),
            Some(_) => Ok(false),
            None => Err(ScribeError::Cancelled),
        }
    }

    /// The compare branch must still add something on top of base
    async fn validate(&self, branches: &BranchPair) -> Result<()> {
        let diff = self.repository.diff(branches).await?;
        if diff.is_empty() {
            return Err(ScribeError::EmptyChangeSet {
                base: branches.base.clone(),
                compare: branches.compare.clone(),
            });
        }
        Ok(())
    }

    async fn create(&self, request: &CreatePullRequest) -> Result<(PullRequestRecord, bool)> {
        match self.repository.create_pull_request(request).await {
            Ok(record) => Ok((record, false)),
            Err(ScribeError::DraftUnsupported(reason)) if request.draft => {
                warn!(%reason, "draft pull request rejected, retrying as regular");
                self.ui.warn(
                    "Draft pull requests are not available for this repository. Creating a regular pull request instead.",
                );
                let regular = CreatePullRequest {
                    draft: false,
                    ..request.clone()
                };
                let record = self.repository.create_pull_request(&regular).await?;
                Ok((record, true))
            }
            Err(e) => Err(e),
        }
    }

    fn finish(&self, record: &PullRequestRecord) {
        info!(number = record.number, url = %record.html_url, "pull request created");

        let marker = if record.draft { " [draft]" } else { "" };
        self.ui.info(&format!(
            "✓ Created pull request #{}{}\n  {}",
            record.number, marker, record.html_url
        ));

        if self.ui.confirm("Open in browser?", false) && !self.ui.open_url(&record.html_url) {
            self.ui.warn("Could not open a browser.");
        }
    }
}

fn branch_pair(base: String, compare: String) -> Result<BranchPair> {
    if base == compare {
        return Err(ScribeError::InvalidInput(format!(
            "Base and compare branch are both '{}'",
            base
        )));
    }
    Ok(BranchPair { base, compare })
}

fn branch_label(branch: &BranchInfo) -> String {
    if branch.is_default {
        format!("{} (default)", branch.name)
    } else {
        branch.name.clone()
    }
}

/// Every branch except `base`, with the checked-out branch first
fn compare_candidates(branches: &[BranchInfo], base: &str, current: Option<&str>) -> Vec<String> {
    let mut names: Vec<String> = branches
        .iter()
        .map(|b| b.name.clone())
        .filter(|name| name != base)
        .collect();

    if let Some(position) = current.and_then(|c| names.iter().position(|n| n == c)) {
        let current = names.remove(position);
        names.insert(0, current);
    }
    names
}
