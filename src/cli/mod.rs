//! CLI module for scribe
//!
//! This module contains all CLI command definitions and handlers using clap.

pub mod auth;
pub mod branch;
pub mod commands;
pub mod commit;
pub mod config;
pub mod pr;

pub use commands::{Cli, Commands};

use crate::cli::commands::StyleArg;
use crate::core::config::{Config, Language, Style};
use crate::error::{Result, ScribeError};

impl From<StyleArg> for Style {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Simple => Style::Simple,
            StyleArg::Normal => Style::Normal,
            StyleArg::Detailed => Style::Detailed,
        }
    }
}

/// Per-run settings given as global flags
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub language: Option<String>,
    pub style: Option<StyleArg>,
}

impl Overrides {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            language: cli.language.clone(),
            style: cli.style,
        }
    }

    /// Stored configuration with the overrides applied
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load()?;
        self.apply(&mut config)?;
        Ok(config)
    }

    pub fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(code) = &self.language {
            config.language = parse_language(code)?;
        }
        if let Some(style) = self.style {
            config.style = style.into();
        }
        Ok(())
    }
}

pub(crate) fn parse_language(code: &str) -> Result<Language> {
    Language::parse(code).ok_or_else(|| {
        ScribeError::InvalidInput(format!(
            "Unknown language '{}'. Available: {}",
            code,
            Language::all()
                .iter()
                .map(|l| l.code())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })
}
