// SPDX-License-Identifier: Apache-2.0

//! Result types returned by command handlers.
//!
//! These types allow command handlers to return data instead of printing
//! directly, improving testability and separation of concerns.

use serde::Serialize;
use ubt_core::{BugSummary, DateWindow};

/// Result from a triage run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TriageReport {
    /// What was triaged (e.g. "team ubuntu-server").
    pub scope: String,
    /// Modification window searched.
    pub window: DateWindow,
    /// Open tasks matching the status filter.
    pub backlog_count: usize,
    /// Updated bugs that survived filtering, sorted by id.
    pub bugs: Vec<BugSummary>,
}

/// Result from the auth status command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AuthStatusResult {
    /// Whether a credential file exists.
    pub authenticated: bool,
    /// Path of the credential file.
    pub credentials_file: String,
    /// Launchpad user name (if authenticated and reachable).
    pub username: Option<String>,
}
