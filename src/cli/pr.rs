//! Pull request CLI command handler

use tracing::debug;

use crate::ai::{client_from_config, PromptSettings};
use crate::cli::commands::PrArgs;
use crate::cli::Overrides;
use crate::core::git::GitRepository;
use crate::core::repository::RepositoryContext;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::interaction::TerminalInteraction;
use crate::preview::{PreviewSlot, TerminalPreview};
use crate::workflow::{PrGenerator, PrOptions, PrOutcome};

/// Handle `scribe pr`
pub async fn handle_pr(args: PrArgs, overrides: &Overrides) -> Result<()> {
    let git = GitRepository::open_current_dir()?;
    let repo_ctx = RepositoryContext::detect(&git)?;
    let config = overrides.load_config()?;

    // Missing keys are reported before anything is asked
    let completion = client_from_config(&config)?;
    let github = GitHubClient::new(repo_ctx.owner.clone(), repo_ctx.name.clone())?;

    println!("Repository: {} (on {})\n", repo_ctx.full_name(), repo_ctx.current_branch);

    let ui = TerminalInteraction::new();
    let mut preview = PreviewSlot::new(Box::new(TerminalPreview::new()));
    let options = PrOptions {
        base: args.base,
        compare: args.head,
    };

    let outcome = PrGenerator::new(
        &github,
        completion.as_ref(),
        &git,
        &ui,
        PromptSettings::from_config(&config),
    )
    .run(&mut preview, &options)
    .await?;

    match outcome {
        PrOutcome::Created {
            record,
            fell_back_to_regular,
        } => debug!(number = record.number, fell_back_to_regular, "pr run finished"),
        PrOutcome::Cancelled => debug!("pr run cancelled"),
    }

    Ok(())
}
