// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # Ubuntu Bug Triage Core
//!
//! Core library for the `ubuntu-bug-triage` CLI: lists Launchpad bugs that
//! recently changed for a team or a package.
//!
//! This crate provides reusable components for:
//! - Launchpad API integration (OAuth credentials, bug task searches)
//! - Team and package triage (backlog counts, updated-bug listings)
//! - Bug filtering (ignored users, per-team package blacklists)
//! - Configuration management
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ubt_core::{DateWindow, FilterParams, LaunchpadClient, PackageTriage, Triage, load_config};
//! use anyhow::Result;
//!
//! # async fn example() -> Result<()> {
//! let config = load_config()?;
//! let client = LaunchpadClient::connect(&config.launchpad, true)?;
//!
//! let today = chrono::Utc::now().date_naive();
//! let params = FilterParams::builder()
//!     .window(DateWindow::parse("1", today)?)
//!     .statuses(config.triage.statuses.clone())
//!     .build();
//!
//! let triage = PackageTriage::new(&client, "cloud-init", true, params).await?;
//! println!("backlog: {}", triage.current_backlog_count().await?);
//! for bug in triage.updated_bugs().await? {
//!     println!("LP: #{} {}", bug.id, bug.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`bug`] - Bug summaries as presented to users
//! - [`config`] - Configuration loading and paths
//! - [`error`] - Error types
//! - [`launchpad`] - Launchpad API (auth, client)
//! - [`tracker`] - Bug tracker abstraction
//! - [`triage`] - Team and package triage

// ============================================================================
// Error Handling
// ============================================================================

pub use error::TriageError;

/// Convenience Result type for triage operations.
///
/// This is equivalent to `std::result::Result<T, TriageError>`.
pub type Result<T> = std::result::Result<T, TriageError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    AppConfig, LaunchpadConfig, TriageConfig, config_dir, config_file_path, load_config,
};

// ============================================================================
// Launchpad Integration
// ============================================================================

pub use launchpad::{Credentials, LaunchpadClient, RequestToken, TokenDance};

// ============================================================================
// Bug Tracker
// ============================================================================

pub use tracker::{
    Activity, BugRecord, BugTracker, Project, Resolution, SearchScope, SourcePackage,
    TagCombinator, Task, TaskQuery, Team,
};

// ============================================================================
// Triage
// ============================================================================

pub use bug::BugSummary;
pub use triage::{
    FilterParams, PackageTriage, TeamTriage, Triage, bug_id_from_link, tasks_to_bug_ids,
};
pub use utils::{DateWindow, truncate};

// ============================================================================
// Modules
// ============================================================================

pub mod bug;
pub mod config;
pub mod error;
pub mod launchpad;
pub mod retry;
pub mod tracker;
pub mod triage;
pub mod utils;
