//! scribe-rs - AI-written commit messages and pull requests
//!
//! Drafts commit messages from staged changes, and pull request titles and
//! descriptions from the diff between two GitHub branches, then opens the
//! pull request after a preview and confirmation.

pub mod ai;
pub mod cli;
pub mod core;
pub mod error;
pub mod github;
pub mod interaction;
pub mod preview;
pub mod workflow;

pub use error::{Result, ScribeError};
