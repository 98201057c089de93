//! git-passport core library.
//!
//! This crate provides the pieces of the pre-commit hook that picks a local
//! committer identity: passport configuration, git config access, candidate
//! resolution, interactive selection, and the hook runner tying them
//! together.

pub mod config;
pub mod errors;
pub mod git;
pub mod hook;
pub mod models;
pub mod resolver;
pub mod selector;

#[cfg(test)]
mod test_support;

// Re-exports for convenience.
pub use config::{PassportConfig, Settings};
pub use git::GitConfigGateway;
pub use hook::{HookRunner, Outcome, PersistPolicy, Reporter};
pub use resolver::IdentityResolver;
pub use selector::{CandidateSelector, TerminalPrompt};
