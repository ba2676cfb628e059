//! Core functionality for scribe-rs
//!
//! This module contains shared business logic including:
//! - Git repository operations
//! - Repository context detection
//! - Credential management
//! - Application configuration

pub mod config;
pub mod credentials;
pub mod git;
pub mod repository;

pub use config::Config;
pub use credentials::{CredentialKind, CredentialStore};
pub use git::{GitRepository, LocalVcs, TemplateKind};
pub use repository::RepositoryContext;
