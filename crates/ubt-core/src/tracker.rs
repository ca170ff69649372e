// SPDX-License-Identifier: Apache-2.0

//! Bug tracker abstraction.
//!
//! Triage only needs a handful of read operations from the remote tracker:
//! name resolution, task search, task counting and bug fetching. The
//! [`BugTracker`] trait captures exactly those, so triage logic can run
//! against Launchpad or an in-memory double.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Outcome of looking an entity up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// The entity exists.
    Found(T),
    /// No entity with that name exists.
    NotFound,
}

impl<T> Resolution<T> {
    /// Returns `true` when the lookup found an entity.
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    /// Borrows the found entity, if any.
    pub fn found(&self) -> Option<&T> {
        match self {
            Resolution::Found(value) => Some(value),
            Resolution::NotFound => None,
        }
    }
}

/// How multiple tags are combined in a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagCombinator {
    /// Every listed tag must match.
    #[default]
    All,
    /// At least one listed tag must match.
    Any,
}

impl TagCombinator {
    /// Wire value understood by the Launchpad search API.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TagCombinator::All => "All",
            TagCombinator::Any => "Any",
        }
    }
}

impl fmt::Display for TagCombinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Launchpad person or team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Short name (without the leading `~`).
    pub name: String,
    /// Canonical API link, used as a search parameter.
    pub self_link: String,
}

/// A source package within the distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePackage {
    /// Package name.
    pub name: String,
    /// Canonical API link.
    pub self_link: String,
}

/// An upstream project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project name.
    pub name: String,
    /// Canonical API link.
    pub self_link: String,
}

/// Target of a task search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    /// The whole distribution.
    Distribution,
    /// One source package in the distribution.
    SourcePackage(SourcePackage),
    /// One upstream project.
    Project(Project),
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchScope::Distribution => write!(f, "distribution"),
            SearchScope::SourcePackage(pkg) => write!(f, "package {}", pkg.name),
            SearchScope::Project(project) => write!(f, "project {}", project.name),
        }
    }
}

/// Filters for a task search.
#[derive(Debug, Clone, Default, PartialEq, Eq, bon::Builder)]
pub struct TaskQuery {
    /// Team link that must be subscribed to the bug.
    pub bug_subscriber: Option<String>,
    /// Team link that must be a structural subscriber of the target.
    pub structural_subscriber: Option<String>,
    /// Only tasks modified at or after this instant.
    pub modified_since: Option<DateTime<Utc>>,
    /// Task statuses to match.
    #[builder(default)]
    pub statuses: Vec<String>,
    /// Tags to match; a leading `-` excludes a tag.
    #[builder(default)]
    pub tags: Vec<String>,
    /// How `tags` combine.
    #[builder(default)]
    pub tags_combinator: TagCombinator,
}

/// One (bug, target) pairing returned by a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Link to the parent bug; its last path segment is the bug id.
    pub bug_link: String,
    /// Target display name, e.g. `cloud-init (Ubuntu)`.
    pub target_name: String,
    /// Task status.
    pub status: String,
    /// Task importance.
    pub importance: String,
}

impl Task {
    /// Source package (or project) name: the target name up to the first space.
    #[must_use]
    pub fn src_pkg(&self) -> &str {
        self.target_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
    }
}

/// One entry in a bug's activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Short name of the person who made the change.
    pub person: String,
    /// When the change happened.
    pub date_changed: DateTime<Utc>,
    /// What changed, as reported by the tracker.
    pub what_changed: String,
}

/// A fully fetched bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugRecord {
    /// Bug id.
    pub id: String,
    /// Bug title.
    pub title: String,
    /// Link to the bug's web page.
    pub web_link: String,
    /// Bug tags.
    pub tags: Vec<String>,
    /// Last modification time.
    pub date_last_updated: DateTime<Utc>,
    /// Tasks belonging to this bug.
    pub tasks: Vec<Task>,
    /// Activity log, in the order the tracker returns it.
    pub activity: Vec<Activity>,
}

/// Read operations triage needs from a remote bug tracker.
#[async_trait]
pub trait BugTracker: Send + Sync {
    /// Looks up a team by name.
    async fn find_team(&self, name: &str) -> Result<Resolution<Team>>;

    /// Looks up a source package in the distribution.
    async fn find_source_package(&self, name: &str) -> Result<Resolution<SourcePackage>>;

    /// Looks up an upstream project.
    async fn find_project(&self, name: &str) -> Result<Resolution<Project>>;

    /// Returns every task in `scope` matching `query`, across all pages.
    async fn search_tasks(&self, scope: &SearchScope, query: &TaskQuery) -> Result<Vec<Task>>;

    /// Returns the number of tasks in `scope` matching `query`.
    async fn count_tasks(&self, scope: &SearchScope, query: &TaskQuery) -> Result<usize>;

    /// Fetches a bug with its tasks and activity.
    async fn fetch_bug(&self, id: &str) -> Result<BugRecord>;
}
