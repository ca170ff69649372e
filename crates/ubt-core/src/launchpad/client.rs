// SPDX-License-Identifier: Apache-2.0

//! Launchpad web service client.
//!
//! [`LaunchpadClient`] is the session: it holds the HTTP client and, for
//! non-anonymous sessions, the OAuth credentials used to sign each request.
//! It implements [`BugTracker`] on top of the `devel` web service.

use std::time::Duration;

use async_trait::async_trait;
use backon::Retryable;
use percent_encoding::utf8_percent_encode;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::UNRESERVED;
use super::auth::{Credentials, ensure_trailing_slash};
use super::types::{
    ActivityEntry, BugEntry, BugTaskEntry, CollectionPage, PersonEntry, TargetEntry,
};
use crate::Result;
use crate::config::LaunchpadConfig;
use crate::error::TriageError;
use crate::retry::{is_retryable, retry_backoff};
use crate::tracker::{
    BugRecord, BugTracker, Project, Resolution, SearchScope, SourcePackage, Task, TaskQuery, Team,
};

type Params = Vec<(&'static str, String)>;

/// Authenticated or anonymous Launchpad session.
#[derive(Debug)]
pub struct LaunchpadClient {
    http: Client,
    api_root: String,
    distribution: String,
    credentials: Option<Credentials>,
}

impl LaunchpadClient {
    /// Opens a session. Anonymous sessions skip the credential file.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::NotAuthenticated` for a non-anonymous session
    /// without a credential file.
    #[instrument(skip(config))]
    pub fn connect(config: &LaunchpadConfig, anon: bool) -> Result<Self> {
        if anon {
            debug!("logging into Launchpad anonymously");
            return Self::new(config, None);
        }

        debug!("logging into Launchpad");
        let credentials = Credentials::load(&config.credentials_path())?
            .ok_or(TriageError::NotAuthenticated)?;
        Self::new(config, Some(credentials))
    }

    /// Creates a session with explicit credentials (or none).
    pub fn new(config: &LaunchpadConfig, credentials: Option<Credentials>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("ubuntu-bug-triage/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_root: ensure_trailing_slash(&config.api_root),
            distribution: config.distribution.clone(),
            credentials,
        })
    }

    /// Whether requests are signed.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    /// The authenticated user's short name.
    pub async fn me(&self) -> Result<String> {
        if !self.is_authenticated() {
            return Err(TriageError::NotAuthenticated);
        }
        let url = format!("{}people/+me", self.api_root);
        let person: PersonEntry = self.get_json(&url, &[]).await?;
        Ok(person.name)
    }

    fn entity_url(&self, name: &str) -> String {
        format!(
            "{}{}",
            self.api_root,
            utf8_percent_encode(name, UNRESERVED)
        )
    }

    fn scope_url(&self, scope: &SearchScope) -> String {
        match scope {
            SearchScope::Distribution => self.entity_url(&self.distribution),
            SearchScope::SourcePackage(pkg) => pkg.self_link.clone(),
            SearchScope::Project(project) => project.self_link.clone(),
        }
    }

    /// One GET, no retry. 404 is reported as `Launchpad { status: Some(404) }`.
    async fn get_once<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T> {
        let mut req = self.http.get(url).query(params);
        if let Some(credentials) = &self.credentials {
            req = req.header(reqwest::header::AUTHORIZATION, credentials.authorization());
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TriageError::Launchpad {
                message: format!("GET {url} failed (HTTP {}): {}", status.as_u16(), body.trim()),
                status: Some(status.as_u16()),
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// GET with retries on transient failures.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T> {
        (|| async { self.get_once(url, params).await })
            .retry(retry_backoff())
            .when(is_retryable)
            .notify(|err, dur| {
                warn!(error = %err, retry_after = ?dur, "Retrying Launchpad request");
            })
            .await
    }

    /// GET where 404 means "does not exist".
    async fn get_optional<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>> {
        match self.get_json(url, params).await {
            Ok(value) => Ok(Some(value)),
            Err(TriageError::Launchpad {
                status: Some(404), ..
            }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Follows `next_collection_link` until the collection is exhausted.
    async fn get_all<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<Vec<T>> {
        let mut page: CollectionPage<T> = self.get_json(url, params).await?;
        let mut entries = std::mem::take(&mut page.entries);
        while let Some(next) = page.next_collection_link.take() {
            debug!(fetched = entries.len(), "Fetching next collection page");
            page = self.get_json(&next, &[]).await?;
            entries.append(&mut page.entries);
        }
        Ok(entries)
    }

    fn search_params(query: &TaskQuery) -> Params {
        let mut params: Params = vec![("ws.op", "searchTasks".to_string())];
        params.extend(query.statuses.iter().map(|s| ("status", s.clone())));
        if !query.tags.is_empty() {
            params.extend(query.tags.iter().map(|t| ("tags", t.clone())));
            params.push(("tags_combinator", query.tags_combinator.as_str().to_string()));
        }
        if let Some(since) = query.modified_since {
            params.push(("modified_since", since.to_rfc3339()));
        }
        if let Some(team) = &query.bug_subscriber {
            params.push(("bug_subscriber", team.clone()));
        }
        if let Some(team) = &query.structural_subscriber {
            params.push(("structural_subscriber", team.clone()));
        }
        params
    }
}

#[async_trait]
impl BugTracker for LaunchpadClient {
    #[instrument(skip(self))]
    async fn find_team(&self, name: &str) -> Result<Resolution<Team>> {
        let url = self.entity_url(&format!("~{name}"));
        Ok(match self.get_optional::<PersonEntry>(&url, &[]).await? {
            Some(person) => Resolution::Found(Team {
                name: person.name,
                self_link: person.self_link,
            }),
            None => Resolution::NotFound,
        })
    }

    #[instrument(skip(self))]
    async fn find_source_package(&self, name: &str) -> Result<Resolution<SourcePackage>> {
        let url = self.entity_url(&self.distribution);
        let params = [
            ("ws.op", "getSourcePackage".to_string()),
            ("name", name.to_string()),
        ];
        // Launchpad answers `null` for unknown packages.
        let entry: Option<TargetEntry> = self.get_json(&url, &params).await?;
        Ok(match entry {
            Some(pkg) => Resolution::Found(SourcePackage {
                name: pkg.name,
                self_link: pkg.self_link,
            }),
            None => Resolution::NotFound,
        })
    }

    #[instrument(skip(self))]
    async fn find_project(&self, name: &str) -> Result<Resolution<Project>> {
        let url = self.entity_url(name);
        Ok(match self.get_optional::<TargetEntry>(&url, &[]).await? {
            Some(project) => Resolution::Found(Project {
                name: project.name,
                self_link: project.self_link,
            }),
            None => Resolution::NotFound,
        })
    }

    #[instrument(skip(self, scope, query), fields(scope = %scope))]
    async fn search_tasks(&self, scope: &SearchScope, query: &TaskQuery) -> Result<Vec<Task>> {
        let url = self.scope_url(scope);
        let entries: Vec<BugTaskEntry> = self.get_all(&url, &Self::search_params(query)).await?;
        debug!(count = entries.len(), "Fetched tasks");
        Ok(entries.into_iter().map(Task::from).collect())
    }

    #[instrument(skip(self, scope, query), fields(scope = %scope))]
    async fn count_tasks(&self, scope: &SearchScope, query: &TaskQuery) -> Result<usize> {
        let url = self.scope_url(scope);
        let mut params = Self::search_params(query);
        params.push(("ws.size", "1".to_string()));

        let page: CollectionPage<BugTaskEntry> = self.get_json(&url, &params).await?;
        if let Some(total) = page.total_size {
            return Ok(total);
        }
        match page.total_size_link {
            Some(link) => self.get_json(&link, &[]).await,
            None => Err(TriageError::Launchpad {
                message: format!("Collection at {url} reported no size"),
                status: None,
            }),
        }
    }

    #[instrument(skip(self))]
    async fn fetch_bug(&self, id: &str) -> Result<BugRecord> {
        let url = format!("{}bugs/{}", self.api_root, utf8_percent_encode(id, UNRESERVED));
        let bug: BugEntry = match self.get_json(&url, &[]).await {
            Err(TriageError::Launchpad {
                status: Some(404), ..
            }) => {
                return Err(TriageError::NotFound {
                    kind: "bug",
                    name: id.to_string(),
                });
            }
            other => other?,
        };

        let tasks: Vec<BugTaskEntry> = self.get_all(&bug.bug_tasks_collection_link, &[]).await?;
        let activity: Vec<ActivityEntry> =
            self.get_all(&bug.activity_collection_link, &[]).await?;

        Ok(BugRecord {
            id: bug.id.to_string(),
            title: bug.title,
            web_link: bug.web_link,
            tags: bug.tags,
            date_last_updated: bug.date_last_updated,
            tasks: tasks.into_iter().map(Task::from).collect(),
            activity: activity.into_iter().map(Into::into).collect(),
        })
    }
}
