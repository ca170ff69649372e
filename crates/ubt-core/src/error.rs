// SPDX-License-Identifier: Apache-2.0

//! Error types for ubuntu-bug-triage.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Application code should use `anyhow::Result` for top-level error handling.

use thiserror::Error;

/// Errors that can occur during triage operations.
#[derive(Error, Debug)]
pub enum TriageError {
    /// Launchpad returned an unexpected response.
    #[error("Launchpad API error: {message}")]
    Launchpad {
        /// Error message.
        message: String,
        /// HTTP status code, when the error came from a response.
        status: Option<u16>,
    },

    /// A named Launchpad entity (team, package, project, bug) does not exist.
    #[error("No Launchpad {kind} named '{name}'")]
    NotFound {
        /// Entity kind (e.g., "team", "project").
        kind: &'static str,
        /// The name that was looked up.
        name: String,
    },

    /// A task's bug link has no trailing identifier segment.
    #[error("Malformed bug reference: '{reference}'")]
    MalformedReference {
        /// The offending reference.
        reference: String,
    },

    /// No stored Launchpad credentials - needs `ubuntu-bug-triage auth login`.
    #[error("Authentication required - run `ubuntu-bug-triage auth login` first, or pass --anon")]
    NotAuthenticated,

    /// Credential file could not be read or written.
    #[error("Credential error: {message}")]
    Credentials {
        /// Error message.
        message: String,
    },

    /// Configuration file error.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// A date or date range argument could not be parsed.
    #[error("Invalid date '{input}'. Expected days, YYYY-MM-DD, or YYYY-MM-DD..YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        input: String,
    },

    /// Network/HTTP error from reqwest.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<config::ConfigError> for TriageError {
    fn from(err: config::ConfigError) -> Self {
        TriageError::Config {
            message: err.to_string(),
        }
    }
}
