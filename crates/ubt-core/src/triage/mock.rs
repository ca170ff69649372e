// SPDX-License-Identifier: Apache-2.0

//! In-memory bug tracker for triage tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::Result;
use crate::error::TriageError;
use crate::tracker::{
    Activity, BugRecord, BugTracker, Project, Resolution, SearchScope, SourcePackage, Task,
    TaskQuery, Team,
};

pub(crate) fn task(bug_id: &str, target: &str) -> Task {
    Task {
        bug_link: format!("https://api.launchpad.net/devel/bugs/{bug_id}"),
        target_name: format!("{target} (Ubuntu)"),
        status: "New".to_string(),
        importance: "Undecided".to_string(),
    }
}

/// A bug reported by `reporter` and last touched by `last_user`, with one
/// task per package.
pub(crate) fn bug(id: &str, packages: &[&str], last_user: &str) -> BugRecord {
    bug_touched_by(id, packages, &["reporter", last_user])
}

/// A bug whose activity log lists `users` in order, one hour apart on the
/// morning of 2024-03-09.
pub(crate) fn bug_touched_by(id: &str, packages: &[&str], users: &[&str]) -> BugRecord {
    BugRecord {
        id: id.to_string(),
        title: format!("Bug {id}"),
        web_link: format!("https://bugs.launchpad.net/bugs/{id}"),
        tags: Vec::new(),
        date_last_updated: Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap(),
        tasks: packages.iter().map(|pkg| task(id, pkg)).collect(),
        activity: users
            .iter()
            .zip(8u32..)
            .map(|(user, hour)| Activity {
                person: (*user).to_string(),
                date_changed: Utc.with_ymd_and_hms(2024, 3, 9, hour, 0, 0).unwrap(),
                what_changed: "status".to_string(),
            })
            .collect(),
    }
}

fn scope_key(scope: &SearchScope) -> String {
    match scope {
        SearchScope::Distribution => "distribution".to_string(),
        SearchScope::SourcePackage(pkg) => format!("package:{}", pkg.name),
        SearchScope::Project(project) => format!("project:{}", project.name),
    }
}

/// Canned tracker. Searches return the tasks registered for a scope,
/// regardless of query; every query is recorded for inspection.
#[derive(Default)]
pub(crate) struct MockTracker {
    pub teams: Vec<String>,
    pub packages: Vec<String>,
    pub projects: Vec<String>,
    pub tasks: HashMap<String, Vec<Task>>,
    pub counts: HashMap<String, usize>,
    pub bugs: HashMap<String, BugRecord>,
    pub queries: Mutex<Vec<(String, TaskQuery)>>,
}

impl MockTracker {
    pub fn with_team(mut self, name: &str) -> Self {
        self.teams.push(name.to_string());
        self
    }

    pub fn with_package(mut self, name: &str) -> Self {
        self.packages.push(name.to_string());
        self
    }

    pub fn with_project(mut self, name: &str) -> Self {
        self.projects.push(name.to_string());
        self
    }

    /// Registers tasks under a scope key (`distribution`, `package:x`, `project:x`).
    pub fn with_tasks(mut self, key: &str, tasks: Vec<Task>) -> Self {
        self.tasks.insert(key.to_string(), tasks);
        self
    }

    pub fn with_count(mut self, key: &str, count: usize) -> Self {
        self.counts.insert(key.to_string(), count);
        self
    }

    pub fn with_bug(mut self, record: BugRecord) -> Self {
        self.bugs.insert(record.id.clone(), record);
        self
    }

    pub fn recorded_queries(&self) -> Vec<(String, TaskQuery)> {
        self.queries.lock().unwrap().clone()
    }

    fn record(&self, scope: &SearchScope, query: &TaskQuery) {
        self.queries
            .lock()
            .unwrap()
            .push((scope_key(scope), query.clone()));
    }
}

#[async_trait]
impl BugTracker for MockTracker {
    async fn find_team(&self, name: &str) -> Result<Resolution<Team>> {
        Ok(if self.teams.iter().any(|t| t == name) {
            Resolution::Found(Team {
                name: name.to_string(),
                self_link: format!("https://api.launchpad.net/devel/~{name}"),
            })
        } else {
            Resolution::NotFound
        })
    }

    async fn find_source_package(&self, name: &str) -> Result<Resolution<SourcePackage>> {
        Ok(if self.packages.iter().any(|p| p == name) {
            Resolution::Found(SourcePackage {
                name: name.to_string(),
                self_link: format!("https://api.launchpad.net/devel/ubuntu/+source/{name}"),
            })
        } else {
            Resolution::NotFound
        })
    }

    async fn find_project(&self, name: &str) -> Result<Resolution<Project>> {
        Ok(if self.projects.iter().any(|p| p == name) {
            Resolution::Found(Project {
                name: name.to_string(),
                self_link: format!("https://api.launchpad.net/devel/{name}"),
            })
        } else {
            Resolution::NotFound
        })
    }

    async fn search_tasks(&self, scope: &SearchScope, query: &TaskQuery) -> Result<Vec<Task>> {
        self.record(scope, query);
        Ok(self.tasks.get(&scope_key(scope)).cloned().unwrap_or_default())
    }

    async fn count_tasks(&self, scope: &SearchScope, query: &TaskQuery) -> Result<usize> {
        self.record(scope, query);
        let key = scope_key(scope);
        Ok(self
            .counts
            .get(&key)
            .copied()
            .unwrap_or_else(|| self.tasks.get(&key).map_or(0, Vec::len)))
    }

    async fn fetch_bug(&self, id: &str) -> Result<BugRecord> {
        self.bugs
            .get(id)
            .cloned()
            .ok_or_else(|| TriageError::NotFound {
                kind: "bug",
                name: id.to_string(),
            })
    }
}
