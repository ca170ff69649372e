// SPDX-License-Identifier: Apache-2.0

//! Backlog counting and updated-bug triage.
//!
//! Two variants share one interface ([`Triage`]):
//! - [`TeamTriage`] scopes searches to packages a team subscribes to
//! - [`PackageTriage`] scopes searches to one package and, optionally,
//!   the same-named upstream project
//!
//! Both are stateless after construction: every call re-queries the tracker.

use std::collections::BTreeSet;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};
use tracing::debug;

use crate::Result;
use crate::bug::BugSummary;
use crate::error::TriageError;
use crate::tracker::{BugTracker, TagCombinator, Task, TaskQuery};
use crate::utils::DateWindow;

mod package;
mod team;

#[cfg(test)]
pub(crate) mod mock;

pub use package::PackageTriage;
pub use team::TeamTriage;

/// Filters shared by both triage variants.
#[derive(Debug, Clone, bon::Builder)]
pub struct FilterParams {
    /// Modification window for the updated-bug listing.
    pub window: DateWindow,
    /// Task statuses to search.
    #[builder(default)]
    pub statuses: Vec<String>,
    /// Tags to search; a leading `-` excludes a tag.
    #[builder(default)]
    pub tags: Vec<String>,
    /// How `tags` combine.
    #[builder(default)]
    pub tags_combinator: TagCombinator,
    /// Bugs last touched by one of these users are dropped.
    #[builder(default)]
    pub ignore_users: Vec<String>,
    /// Bug details fetched in parallel.
    #[builder(default = 5)]
    pub max_concurrent_fetches: usize,
}

impl FilterParams {
    /// Query without the modification bound, used for backlog counts.
    fn backlog_query(&self) -> TaskQuery {
        TaskQuery::builder()
            .statuses(self.statuses.clone())
            .tags(self.tags.clone())
            .tags_combinator(self.tags_combinator)
            .build()
    }

    /// Query bounded by the window start, used for updated-bug listings.
    fn updated_query(&self) -> TaskQuery {
        TaskQuery {
            modified_since: Some(self.window.since),
            ..self.backlog_query()
        }
    }

    /// Drops bugs last touched by an ignored user or updated after the window.
    fn keep(&self, bug: &BugSummary) -> bool {
        if bug.last_active_in(&self.ignore_users) {
            debug!(bug = %bug.id, user = ?bug.last_active_user, "skipping bug: ignored user");
            return false;
        }
        if !self.window.admits(bug.date_last_updated) {
            debug!(bug = %bug.id, "skipping bug: updated after window");
            return false;
        }
        true
    }
}

/// Common interface of both triage variants.
#[async_trait]
pub trait Triage: Send + Sync {
    /// Human-readable description of what is being triaged.
    fn scope(&self) -> String;

    /// Number of open tasks matching the status (and tag) filters.
    async fn current_backlog_count(&self) -> Result<usize>;

    /// Bugs updated within the window, deduplicated, sorted by id, filtered.
    async fn updated_bugs(&self) -> Result<Vec<BugSummary>>;
}

/// Extracts a bug id from a bug link: its last path segment.
pub fn bug_id_from_link(link: &str) -> Result<String> {
    match link.rsplit('/').next() {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(TriageError::MalformedReference {
            reference: link.to_string(),
        }),
    }
}

/// Reduces tasks to sorted, unique bug ids.
///
/// `tasks` may chain several independently paginated collections; the result
/// does not depend on their order.
pub fn tasks_to_bug_ids<'a, I>(tasks: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a Task>,
{
    let ids = tasks
        .into_iter()
        .map(|task| bug_id_from_link(&task.bug_link))
        .collect::<Result<BTreeSet<_>>>()?;
    Ok(ids.into_iter().collect())
}

/// Fetches each bug id into a summary, preserving id order.
async fn fetch_summaries(
    tracker: &dyn BugTracker,
    ids: Vec<String>,
    params: &FilterParams,
) -> Result<Vec<BugSummary>> {
    debug!(count = ids.len(), "Fetching bug details");
    let ignore_users = params.ignore_users.as_slice();
    stream::iter(ids)
        .map(|id| async move {
            tracker
                .fetch_bug(&id)
                .await
                .map(|record| BugSummary::new(record, ignore_users))
        })
        .buffered(params.max_concurrent_fetches.max(1))
        .try_collect()
        .await
}
