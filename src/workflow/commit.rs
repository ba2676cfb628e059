//! Commit message generation run

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::ai::{generate_commit_message, prompts::commit_prompts, CompletionClient, PromptSettings};
use crate::core::git::{LocalVcs, TemplateKind};
use crate::error::{Result, ScribeError};
use crate::interaction::Interaction;

/// File name of the default message file inside the git directory
pub const COMMIT_MESSAGE_FILE: &str = "SCRIBE_EDITMSG";

/// Where a generated commit message ends up
pub trait CommitMessageSink {
    fn deliver(&self, message: &str, ui: &dyn Interaction) -> Result<()>;
}

/// Writes the message to a file the user can hand to `git commit -e -F`
#[derive(Debug, Clone)]
pub struct MessageFile {
    path: PathBuf,
}

impl MessageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<git-dir>/SCRIBE_EDITMSG`
    pub fn in_git_dir(git_dir: impl Into<PathBuf>) -> Self {
        Self::new(git_dir.into().join(COMMIT_MESSAGE_FILE))
    }
}

impl CommitMessageSink for MessageFile {
    fn deliver(&self, message: &str, ui: &dyn Interaction) -> Result<()> {
        fs::write(&self.path, format!("{}\n", message))?;
        debug!(path = %self.path.display(), "commit message written");

        ui.info(&format!("\n{}\n", message));
        ui.info(&format!(
            "Message saved to {}\nCommit with:\n  git commit -e -F {}",
            self.path.display(),
            self.path.display()
        ));
        Ok(())
    }
}

/// Only prints the message
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintOnly;

impl CommitMessageSink for PrintOnly {
    fn deliver(&self, message: &str, ui: &dyn Interaction) -> Result<()> {
        ui.info(message);
        Ok(())
    }
}

/// Drives a commit message run
pub struct CommitGenerator<'a> {
    vcs: &'a dyn LocalVcs,
    completion: &'a dyn CompletionClient,
    ui: &'a dyn Interaction,
    settings: PromptSettings,
}

impl<'a> CommitGenerator<'a> {
    pub fn new(
        vcs: &'a dyn LocalVcs,
        completion: &'a dyn CompletionClient,
        ui: &'a dyn Interaction,
        settings: PromptSettings,
    ) -> Self {
        Self {
            vcs,
            completion,
            ui,
            settings,
        }
    }

    /// Generate a message for the staged changes and hand it to `sink`
    ///
    /// With nothing staged, every working-tree change is staged first.
    pub async fn run(&self, sink: &dyn CommitMessageSink) -> Result<String> {
        let mut diff = self.vcs.staged_diff()?;

        if diff.trim().is_empty() {
            self.ui.info("No staged changes, staging all changes...");
            self.vcs.stage_all()?;
            diff = self.vcs.staged_diff()?;
        }

        if diff.trim().is_empty() {
            return Err(ScribeError::NothingToCommit);
        }

        let template = self.vcs.discover_template(TemplateKind::Commit)?;
        if template.is_some() {
            debug!("using commit template");
        }

        self.ui.info(&format!(
            "Generating commit message with {}...",
            self.completion.describe()
        ));
        let prompt = commit_prompts(&diff, self.settings, template.as_deref());
        let message =
            generate_commit_message(self.completion, &prompt, self.settings.style.budget()).await?;

        info!(lines = message.lines().count(), "commit message generated");
        sink.deliver(&message, self.ui)?;
        Ok(message)
    }
}
