// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! Downcasts `anyhow::Error` to `TriageError` and appends a hint for the
//! user. Structured error data stays in the library; presentation lives here.

use anyhow::Error;
use ubt_core::error::TriageError;

/// Formats an error for CLI display with helpful hints.
///
/// If the error is not a `TriageError`, returns the full error chain.
pub fn format_error(error: &Error) -> String {
    let Some(triage_err) = error.downcast_ref::<TriageError>() else {
        return format!("{error:#}");
    };

    match triage_err {
        TriageError::NotAuthenticated => triage_err.to_string(),
        TriageError::NotFound { kind: "team", .. } => format!(
            "{triage_err}\n\nTip: Team names are Launchpad short names, e.g. `ubuntu-server`."
        ),
        TriageError::NotFound { .. } | TriageError::MalformedReference { .. } => {
            triage_err.to_string()
        }
        TriageError::Launchpad {
            status: Some(401 | 403),
            ..
        } => format!(
            "{triage_err}\n\nTip: Your credentials may have been revoked. Run `ubuntu-bug-triage auth login` again."
        ),
        TriageError::Launchpad { .. } => format!(
            "{triage_err}\n\nTip: Launchpad may be temporarily unavailable. Try again in a moment."
        ),
        TriageError::Credentials { .. } => format!(
            "{triage_err}\n\nTip: Remove the file with `ubuntu-bug-triage auth logout` and log in again."
        ),
        TriageError::Config { .. } => format!(
            "{triage_err}\n\nTip: Check your config file at {}",
            ubt_core::config::config_file_path().display()
        ),
        TriageError::InvalidDate { .. } => format!(
            "{triage_err}\n\nTip: Use `3` for three days back, `2024-03-01`, or `2024-03-01..2024-03-05`."
        ),
        TriageError::Network(_) => {
            format!("{triage_err}\n\nTip: Check your internet connection and try again.")
        }
    }
}
