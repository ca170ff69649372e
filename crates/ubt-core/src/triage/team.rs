// SPDX-License-Identifier: Apache-2.0

//! Triage of every package a team subscribes to.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{FilterParams, Triage, fetch_summaries, tasks_to_bug_ids};
use crate::Result;
use crate::bug::BugSummary;
use crate::error::TriageError;
use crate::tracker::{BugTracker, Resolution, SearchScope, Team, TaskQuery};

/// Triage of Launchpad bugs for one team.
pub struct TeamTriage<'a> {
    tracker: &'a dyn BugTracker,
    team: Team,
    params: FilterParams,
    /// This team's blacklist entry, if it has one.
    blacklist: Option<BTreeSet<String>>,
}

impl<'a> TeamTriage<'a> {
    /// Resolves `name` to a team and binds the filters.
    ///
    /// `blacklist` maps team names to packages whose bugs are skipped; only
    /// this team's entry is kept.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::NotFound` when no such team exists.
    #[instrument(skip(tracker, params, blacklist))]
    pub async fn new(
        tracker: &'a dyn BugTracker,
        name: &str,
        params: FilterParams,
        blacklist: &HashMap<String, BTreeSet<String>>,
    ) -> Result<Self> {
        debug!("finding bugs for team: {name}");
        let team = match tracker.find_team(name).await? {
            Resolution::Found(team) => team,
            Resolution::NotFound => {
                return Err(TriageError::NotFound {
                    kind: "team",
                    name: name.to_string(),
                });
            }
        };

        Ok(Self {
            blacklist: blacklist.get(&team.name).cloned(),
            tracker,
            team,
            params,
        })
    }

    /// The resolved team.
    #[must_use]
    pub fn team(&self) -> &Team {
        &self.team
    }

    /// True when every task of `bug` targets a blacklisted package.
    fn all_src_on_blacklist(bug: &BugSummary, blacklist: &BTreeSet<String>) -> bool {
        bug.src_pkgs().all(|pkg| blacklist.contains(pkg))
    }
}

#[async_trait]
impl Triage for TeamTriage<'_> {
    fn scope(&self) -> String {
        format!("team {}", self.team.name)
    }

    #[instrument(skip(self), fields(team = %self.team.name))]
    async fn current_backlog_count(&self) -> Result<usize> {
        let query = TaskQuery::builder()
            .bug_subscriber(self.team.self_link.clone())
            .statuses(self.params.statuses.clone())
            .build();
        self.tracker
            .count_tasks(&SearchScope::Distribution, &query)
            .await
    }

    #[instrument(skip(self), fields(team = %self.team.name))]
    async fn updated_bugs(&self) -> Result<Vec<BugSummary>> {
        let query = TaskQuery {
            structural_subscriber: Some(self.team.self_link.clone()),
            ..self.params.updated_query()
        };
        let tasks = self
            .tracker
            .search_tasks(&SearchScope::Distribution, &query)
            .await?;
        let ids = tasks_to_bug_ids(&tasks)?;

        let summaries = fetch_summaries(self.tracker, ids, &self.params).await?;

        let bugs: Vec<BugSummary> = summaries
            .into_iter()
            .filter(|bug| {
                if let Some(blacklist) = &self.blacklist
                    && Self::all_src_on_blacklist(bug, blacklist)
                {
                    debug!("skipping bug: {}", bug.id);
                    return false;
                }
                self.params.keep(bug)
            })
            .collect();

        debug!(count = bugs.len(), "Updated bugs after filtering");
        Ok(bugs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::TagCombinator;
    use crate::triage::mock::{MockTracker, bug, bug_touched_by, task};
    use crate::utils::DateWindow;
    use chrono::NaiveDate;

    fn params() -> FilterParams {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        FilterParams::builder()
            .window(DateWindow::parse("1", today).unwrap())
            .statuses(vec!["New".to_string(), "Confirmed".to_string()])
            .tags(vec!["server".to_string()])
            .tags_combinator(TagCombinator::Any)
            .ignore_users(vec!["janitor".to_string()])
            .build()
    }

    fn blacklist(team: &str, pkgs: &[&str]) -> HashMap<String, BTreeSet<String>> {
        HashMap::from([(
            team.to_string(),
            pkgs.iter().map(ToString::to_string).collect(),
        )])
    }

    #[tokio::test]
    async fn test_unknown_team_is_fatal() {
        let tracker = MockTracker::default();
        let result = TeamTriage::new(&tracker, "nobody", params(), &HashMap::new()).await;
        assert!(matches!(
            result,
            Err(TriageError::NotFound { kind: "team", .. })
        ));
    }

    #[tokio::test]
    async fn test_backlog_count_queries_subscriber_and_status() {
        let tracker = MockTracker::default()
            .with_team("ubuntu-server")
            .with_count("distribution", 42);
        let triage = TeamTriage::new(&tracker, "ubuntu-server", params(), &HashMap::new())
            .await
            .unwrap();

        assert_eq!(triage.current_backlog_count().await.unwrap(), 42);

        let queries = tracker.recorded_queries();
        assert_eq!(queries.len(), 1);
        let (scope, query) = &queries[0];
        assert_eq!(scope, "distribution");
        assert_eq!(
            query.bug_subscriber.as_deref(),
            Some("https://api.launchpad.net/devel/~ubuntu-server")
        );
        assert_eq!(query.statuses, vec!["New", "Confirmed"]);
        assert!(query.modified_since.is_none());
        assert!(query.tags.is_empty());
    }

    #[tokio::test]
    async fn test_updated_bugs_query_parameters() {
        let tracker = MockTracker::default().with_team("ubuntu-server");
        let triage = TeamTriage::new(&tracker, "ubuntu-server", params(), &HashMap::new())
            .await
            .unwrap();

        assert!(triage.updated_bugs().await.unwrap().is_empty());

        let (_, query) = &tracker.recorded_queries()[0];
        assert_eq!(
            query.structural_subscriber.as_deref(),
            Some("https://api.launchpad.net/devel/~ubuntu-server")
        );
        assert!(query.modified_since.is_some());
        assert_eq!(query.tags, vec!["server"]);
        assert_eq!(query.tags_combinator, TagCombinator::Any);
    }

    #[tokio::test]
    async fn test_updated_bugs_deduplicates_and_sorts() {
        let tracker = MockTracker::default()
            .with_team("ubuntu-server")
            .with_tasks(
                "distribution",
                vec![task("300", "nginx"), task("100", "vim"), task("300", "php")],
            )
            .with_bug(bug("100", &["vim"], "alice"))
            .with_bug(bug("300", &["nginx", "php"], "bob"));
        let triage = TeamTriage::new(&tracker, "ubuntu-server", params(), &HashMap::new())
            .await
            .unwrap();

        let ids: Vec<String> = triage
            .updated_bugs()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["100", "300"]);
    }

    #[tokio::test]
    async fn test_ignored_user_activity_does_not_hide_bug() {
        let tracker = MockTracker::default()
            .with_team("ubuntu-server")
            .with_tasks("distribution", vec![task("1", "vim"), task("2", "vim")])
            .with_bug(bug_touched_by("1", &["vim"], &["alice", "janitor"]))
            .with_bug(bug("2", &["vim"], "bob"));
        let triage = TeamTriage::new(&tracker, "ubuntu-server", params(), &HashMap::new())
            .await
            .unwrap();

        let bugs = triage.updated_bugs().await.unwrap();
        let last: Vec<(&str, Option<&str>)> = bugs
            .iter()
            .map(|b| (b.id.as_str(), b.last_active_user.as_deref()))
            .collect();
        assert_eq!(last, vec![("1", Some("alice")), ("2", Some("bob"))]);
    }

    #[tokio::test]
    async fn test_fully_blacklisted_bug_dropped() {
        let tracker = MockTracker::default()
            .with_team("ubuntu-server")
            .with_tasks("distribution", vec![task("1", "cloud-init")])
            .with_bug(bug("1", &["cloud-init", "curtin"], "alice"));
        let triage = TeamTriage::new(
            &tracker,
            "ubuntu-server",
            params(),
            &blacklist("ubuntu-server", &["cloud-init", "curtin"]),
        )
        .await
        .unwrap();

        assert!(triage.updated_bugs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partially_blacklisted_bug_kept() {
        let tracker = MockTracker::default()
            .with_team("ubuntu-server")
            .with_tasks("distribution", vec![task("1", "cloud-init")])
            .with_bug(bug("1", &["cloud-init", "nginx"], "alice"));
        let triage = TeamTriage::new(
            &tracker,
            "ubuntu-server",
            params(),
            &blacklist("ubuntu-server", &["cloud-init"]),
        )
        .await
        .unwrap();

        assert_eq!(triage.updated_bugs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_other_teams_blacklist_ignored() {
        let tracker = MockTracker::default()
            .with_team("ubuntu-server")
            .with_tasks("distribution", vec![task("1", "cloud-init")])
            .with_bug(bug("1", &["cloud-init"], "alice"));
        let triage = TeamTriage::new(
            &tracker,
            "ubuntu-server",
            params(),
            &blacklist("desktop-packages", &["cloud-init"]),
        )
        .await
        .unwrap();

        assert_eq!(triage.updated_bugs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let tracker = MockTracker::default()
            .with_team("ubuntu-server")
            .with_tasks("distribution", vec![task("1", "vim")]);
        let triage = TeamTriage::new(&tracker, "ubuntu-server", params(), &HashMap::new())
            .await
            .unwrap();

        assert!(triage.updated_bugs().await.is_err());
    }
}
