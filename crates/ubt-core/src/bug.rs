// SPDX-License-Identifier: Apache-2.0

//! Presentation wrapper around a fetched bug.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tracker::{BugRecord, Task};

/// Short-link prefix for Launchpad bugs.
pub const SHORT_LINK_PREFIX: &str = "https://pad.lv/";

/// A bug as shown in triage output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BugSummary {
    /// Bug id.
    pub id: String,
    /// Bug title.
    pub title: String,
    /// Full web link.
    pub url: String,
    /// `https://pad.lv/<id>` short link.
    pub short_url: String,
    /// Bug tags.
    pub tags: Vec<String>,
    /// Last modification time.
    pub date_last_updated: DateTime<Utc>,
    /// Tasks belonging to the bug.
    pub tasks: Vec<Task>,
    /// Person behind the most recent activity entry, ignored users excluded.
    pub last_active_user: Option<String>,
}

impl BugSummary {
    /// Builds a summary from a fetched bug record.
    ///
    /// Activity by `ignore_users` does not count towards the last-active user.
    #[must_use]
    pub fn new(record: BugRecord, ignore_users: &[String]) -> Self {
        let last_active_user = last_active_user(&record, ignore_users);
        Self {
            short_url: format!("{SHORT_LINK_PREFIX}{}", record.id),
            id: record.id,
            title: record.title,
            url: record.web_link,
            tags: record.tags,
            date_last_updated: record.date_last_updated,
            tasks: record.tasks,
            last_active_user,
        }
    }

    /// Source package names of all tasks, in task order.
    pub fn src_pkgs(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(Task::src_pkg)
    }

    /// Returns `true` if the last activity was made by one of `users`.
    #[must_use]
    pub fn last_active_in(&self, users: &[String]) -> bool {
        self.last_active_user
            .as_ref()
            .is_some_and(|user| users.contains(user))
    }
}

/// Latest activity entry by date outside `ignore_users`; ties go to the later
/// entry in the log.
fn last_active_user(record: &BugRecord, ignore_users: &[String]) -> Option<String> {
    record
        .activity
        .iter()
        .enumerate()
        .filter(|(_, entry)| !ignore_users.contains(&entry.person))
        .max_by_key(|(idx, entry)| (entry.date_changed, *idx))
        .map(|(_, entry)| entry.person.clone())
}
