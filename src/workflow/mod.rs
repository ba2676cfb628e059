//! Generation runs
//!
//! Each run is a sequence of awaited steps over the repository, completion
//! and local git collaborators, with the user consulted through
//! [`Interaction`](crate::interaction::Interaction).

pub mod commit;
pub mod pr;

pub use commit::{CommitGenerator, CommitMessageSink, MessageFile, PrintOnly};
pub use pr::{PrGenerator, PrOptions, PrOutcome};
