//! Commit CLI command handler

use crate::ai::{client_from_config, PromptSettings};
use crate::cli::commands::CommitArgs;
use crate::cli::Overrides;
use crate::core::git::GitRepository;
use crate::error::Result;
use crate::interaction::TerminalInteraction;
use crate::workflow::{CommitGenerator, CommitMessageSink, MessageFile, PrintOnly};

/// Handle `scribe commit`
pub async fn handle_commit(args: CommitArgs, overrides: &Overrides) -> Result<()> {
    let git = GitRepository::open_current_dir()?;
    let config = overrides.load_config()?;
    let client = client_from_config(&config)?;
    let ui = TerminalInteraction::new();

    let sink: Box<dyn CommitMessageSink> = if args.print {
        Box::new(PrintOnly)
    } else if let Some(path) = args.output {
        Box::new(MessageFile::new(path))
    } else {
        Box::new(MessageFile::in_git_dir(git.git_dir()))
    };

    CommitGenerator::new(&git, client.as_ref(), &ui, PromptSettings::from_config(&config))
        .run(sink.as_ref())
        .await?;

    Ok(())
}
