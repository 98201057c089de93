//! Error types for the git-passport core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`PassportError`] enum unifies them for the hook runner.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for a single hook run.
#[derive(Debug, Error)]
pub enum PassportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Terminal(#[from] TerminalError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from loading and validating the passport configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A top-level table that is neither `General` nor a passport section.
    #[error("unknown configuration section '{0}'")]
    UnknownSection(String),

    /// A key that does not belong to its section.
    #[error("unknown key '{key}' in section '{section}'")]
    UnknownKey {
        section: String,
        key: String,
    },

    /// A required section is absent.
    #[error("missing configuration section '{0}'")]
    MissingSection(String),

    /// A required key is absent.
    #[error("missing key '{key}' in section '{section}'")]
    MissingKey {
        section: String,
        key: String,
    },

    /// A config value is malformed.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue {
        field: String,
        detail: String,
    },

    /// Generic I/O error reading or writing the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Gateway errors
// ---------------------------------------------------------------------------

/// Errors from reading or writing git configuration.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The working directory is not inside a git repository.
    #[error("git repository not found at '{0}'")]
    RepositoryNotFound(String),

    /// A `git2` library error while reading configuration.
    #[error("git2 error: {0}")]
    Git2Error(#[from] git2::Error),

    /// Writing the local identity failed.
    #[error("failed to persist local user.{property}: {source}")]
    PersistFailed {
        property: String,
        #[source]
        source: git2::Error,
    },
}

// ---------------------------------------------------------------------------
// Terminal errors
// ---------------------------------------------------------------------------

/// Errors from the interactive terminal used for selection prompts.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// No controlling terminal could be opened.
    #[error("controlling terminal unavailable: {0}")]
    Unavailable(#[source] std::io::Error),

    /// The terminal reached end-of-file before a choice was made.
    #[error("terminal closed before a passport was selected")]
    Closed,

    /// Reading from or writing to the terminal failed.
    #[error("terminal I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
