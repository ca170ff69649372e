// SPDX-License-Identifier: Apache-2.0

//! Triage of one source package and, optionally, the same-named project.

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::{FilterParams, Triage, fetch_summaries, tasks_to_bug_ids};
use crate::Result;
use crate::bug::BugSummary;
use crate::tracker::{BugTracker, Project, Resolution, SearchScope, SourcePackage};

/// Triage of Launchpad bugs for one package.
pub struct PackageTriage<'a> {
    tracker: &'a dyn BugTracker,
    name: String,
    package: Resolution<SourcePackage>,
    project: Resolution<Project>,
    params: FilterParams,
}

impl<'a> PackageTriage<'a> {
    /// Resolves the package and, when `include_project` is set, the project.
    ///
    /// Unresolved names are logged and skipped; triage proceeds with
    /// whichever scope resolved.
    #[instrument(skip(tracker, params))]
    pub async fn new(
        tracker: &'a dyn BugTracker,
        name: &str,
        include_project: bool,
        params: FilterParams,
    ) -> Result<Self> {
        debug!("finding bugs for package: {name}");
        let package = tracker.find_source_package(name).await?;
        if !package.is_found() {
            warn!("no Ubuntu package named '{name}' exists");
        }

        let project = if include_project {
            let project = tracker.find_project(name).await?;
            if !project.is_found() {
                warn!("no Launchpad project named '{name}' exists");
            }
            project
        } else {
            Resolution::NotFound
        };

        Ok(Self {
            tracker,
            name: name.to_string(),
            package,
            project,
            params,
        })
    }

    /// The package lookup outcome.
    #[must_use]
    pub fn package(&self) -> &Resolution<SourcePackage> {
        &self.package
    }

    /// The project lookup outcome (`NotFound` when not requested).
    #[must_use]
    pub fn project(&self) -> &Resolution<Project> {
        &self.project
    }

    /// Resolved scopes, package first.
    fn scopes(&self) -> Vec<SearchScope> {
        let mut scopes = Vec::with_capacity(2);
        if let Resolution::Found(pkg) = &self.package {
            scopes.push(SearchScope::SourcePackage(pkg.clone()));
        }
        if let Resolution::Found(project) = &self.project {
            scopes.push(SearchScope::Project(project.clone()));
        }
        scopes
    }
}

#[async_trait]
impl Triage for PackageTriage<'_> {
    fn scope(&self) -> String {
        match (&self.package, &self.project) {
            (Resolution::Found(_), Resolution::Found(_)) => {
                format!("package and project {}", self.name)
            }
            (Resolution::NotFound, Resolution::Found(_)) => format!("project {}", self.name),
            _ => format!("package {}", self.name),
        }
    }

    #[instrument(skip(self), fields(name = %self.name))]
    async fn current_backlog_count(&self) -> Result<usize> {
        let query = self.params.backlog_query();
        let mut count = 0;
        for scope in self.scopes() {
            count += self.tracker.count_tasks(&scope, &query).await?;
        }
        Ok(count)
    }

    #[instrument(skip(self), fields(name = %self.name))]
    async fn updated_bugs(&self) -> Result<Vec<BugSummary>> {
        let query = self.params.updated_query();
        let mut tasks = Vec::new();
        for scope in self.scopes() {
            let found = self.tracker.search_tasks(&scope, &query).await?;
            debug!(scope = %scope, count = found.len(), "Fetched updated tasks");
            tasks.extend(found);
        }
        let ids = tasks_to_bug_ids(&tasks)?;

        let summaries = fetch_summaries(self.tracker, ids, &self.params).await?;

        Ok(summaries
            .into_iter()
            .filter(|bug| self.params.keep(bug))
            .collect())
    }
}
