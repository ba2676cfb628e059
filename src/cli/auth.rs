//! Authentication CLI command handlers

use std::io::{self, Write};

use octocrab::Octocrab;

use crate::cli::commands::AuthCommand;
use crate::core::credentials::{CredentialKind, CredentialStore};
use crate::error::{Result, ScribeError};
use crate::github::open_browser;

const TOKEN_URL: &str =
    "https://github.com/settings/tokens/new?scopes=repo&description=scribe-rs";

/// Handle authentication commands
pub async fn handle_auth(command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Login => handle_login().await,
        AuthCommand::Logout => handle_logout(),
        AuthCommand::Status => handle_status(),
    }
}

/// Read a Personal Access Token from stdin, validate it, store it
async fn handle_login() -> Result<()> {
    if CredentialStore::has(CredentialKind::GitHubToken)? {
        println!("✓ Already authenticated with GitHub.");
        println!();
        println!("  To re-authenticate, first run: scribe auth logout");
        return Ok(());
    }

    println!("Personal Access Token Authentication");
    println!("====================================");
    println!();
    println!("To create a token:");
    println!("  1. Go to: https://github.com/settings/tokens/new");
    println!("  2. Select the 'repo' scope");
    println!("  3. Click 'Generate token' and copy it");
    println!();

    if open_browser(TOKEN_URL) {
        println!("✓ Browser opened to token creation page.");
        println!();
    }

    print!("Paste your token here: ");
    io::stdout().flush()?;

    let mut token = String::new();
    io::stdin().read_line(&mut token)?;
    let token = token.trim().to_string();

    if token.is_empty() {
        return Err(ScribeError::InvalidInput("No token provided".to_string()));
    }

    println!();
    println!("Validating token...");
    let login = validate_token(&token).await?;
    println!("✓ Token valid! Logged in as @{}", login);

    CredentialStore::store(CredentialKind::GitHubToken, &token)?;
    println!("✓ Token stored in the system keyring.");
    Ok(())
}

/// Ask GitHub who the token belongs to
async fn validate_token(token: &str) -> Result<String> {
    let octocrab = Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(|e| ScribeError::AuthenticationFailed(e.to_string()))?;

    let user = octocrab.current().user().await.map_err(|_| {
        ScribeError::AuthenticationFailed(
            "Invalid token. Please check the token and try again.".to_string(),
        )
    })?;

    Ok(user.login)
}

fn handle_logout() -> Result<()> {
    if !CredentialStore::has(CredentialKind::GitHubToken)? {
        println!("Not currently authenticated.");
        return Ok(());
    }

    CredentialStore::delete(CredentialKind::GitHubToken)?;
    println!("Successfully logged out.");

    if std::env::var(CredentialKind::GitHubToken.env_var()).is_ok() {
        println!(
            "  Note: {} is still set in your environment.",
            CredentialKind::GitHubToken.env_var()
        );
    }
    Ok(())
}

fn handle_status() -> Result<()> {
    println!("Authentication Status:");
    for (label, kind) in [
        ("GitHub", CredentialKind::GitHubToken),
        ("Gemini", CredentialKind::GeminiKey),
        ("OpenAI", CredentialKind::OpenAiKey),
    ] {
        match CredentialStore::get(kind)? {
            Some(secret) => println!(
                "  {:<7} configured ({})",
                format!("{}:", label),
                CredentialStore::mask_token(&secret)
            ),
            None => println!("  {:<7} not configured", format!("{}:", label)),
        }
    }
    Ok(())
}
