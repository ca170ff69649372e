// SPDX-License-Identifier: Apache-2.0

//! Launchpad web service representations.
//!
//! Only the fields triage reads are modelled; serde ignores the rest.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::tracker::{Activity, Task};

/// One page of a Launchpad collection.
#[derive(Debug, Deserialize)]
pub struct CollectionPage<T> {
    /// Entries on this page.
    #[serde(default = "Vec::new")]
    pub entries: Vec<T>,
    /// Link to the next page, absent on the last page.
    pub next_collection_link: Option<String>,
    /// Collection size, when Launchpad computed it inline.
    pub total_size: Option<usize>,
    /// Link returning the collection size as a bare integer.
    pub total_size_link: Option<String>,
}

/// A person or team entry.
#[derive(Debug, Deserialize)]
pub struct PersonEntry {
    pub name: String,
    pub self_link: String,
}

/// A source package or project entry; both carry the same fields we need.
#[derive(Debug, Deserialize)]
pub struct TargetEntry {
    pub name: String,
    pub self_link: String,
}

/// A bug task entry.
#[derive(Debug, Deserialize)]
pub struct BugTaskEntry {
    pub bug_link: String,
    pub bug_target_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub importance: String,
}

impl From<BugTaskEntry> for Task {
    fn from(entry: BugTaskEntry) -> Self {
        Task {
            bug_link: entry.bug_link,
            target_name: entry.bug_target_name,
            status: entry.status,
            importance: entry.importance,
        }
    }
}

/// A bug entry.
#[derive(Debug, Deserialize)]
pub struct BugEntry {
    pub id: u64,
    pub title: String,
    pub web_link: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date_last_updated: DateTime<Utc>,
    pub bug_tasks_collection_link: String,
    pub activity_collection_link: String,
}

/// A bug activity entry.
#[derive(Debug, Deserialize)]
pub struct ActivityEntry {
    pub person_link: Option<String>,
    pub datechanged: DateTime<Utc>,
    #[serde(default)]
    pub whatchanged: String,
}

impl From<ActivityEntry> for Activity {
    fn from(entry: ActivityEntry) -> Self {
        Activity {
            person: entry
                .person_link
                .as_deref()
                .map_or_else(|| "unknown".to_string(), person_name),
            date_changed: entry.datechanged,
            what_changed: entry.whatchanged,
        }
    }
}

/// Short name from a person link (`.../~name` -> `name`).
pub fn person_name(link: &str) -> String {
    let segment = link.trim_end_matches('/').rsplit('/').next().unwrap_or(link);
    segment.trim_start_matches('~').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name() {
        assert_eq!(person_name("https://api.launchpad.net/devel/~janitor"), "janitor");
        assert_eq!(person_name("https://api.launchpad.net/devel/~alice/"), "alice");
    }

    #[test]
    fn test_parse_task_page() {
        let json = r#"{
            "total_size": 2,
            "start": 0,
            "entries": [
                {"bug_link": "https://api.launchpad.net/devel/bugs/1", "bug_target_name": "vim (Ubuntu)",
                 "status": "New", "importance": "Low", "title": "Bug #1 in vim (Ubuntu): \"x\""},
                {"bug_link": "https://api.launchpad.net/devel/bugs/2", "bug_target_name": "vim (Ubuntu)",
                 "status": "Confirmed", "importance": "High"}
            ]
        }"#;
        let page: CollectionPage<BugTaskEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_size, Some(2));
        assert!(page.next_collection_link.is_none());

        let tasks: Vec<Task> = page.entries.into_iter().map(Task::from).collect();
        assert_eq!(tasks[1].status, "Confirmed");
        assert_eq!(tasks[0].src_pkg(), "vim");
    }

    #[test]
    fn test_parse_page_with_size_link() {
        let json = r#"{
            "start": 0,
            "total_size_link": "https://api.launchpad.net/devel/ubuntu?ws.op=searchTasks&ws.show=total_size",
            "next_collection_link": "https://api.launchpad.net/devel/ubuntu?ws.op=searchTasks&ws.start=75",
            "entries": []
        }"#;
        let page: CollectionPage<BugTaskEntry> = serde_json::from_str(json).unwrap();
        assert!(page.total_size.is_none());
        assert!(page.total_size_link.is_some());
        assert!(page.next_collection_link.is_some());
    }

    #[test]
    fn test_parse_activity_with_offset_timestamp() {
        let json = r#"{
            "person_link": "https://api.launchpad.net/devel/~bob",
            "datechanged": "2024-03-09T12:34:56.789012+00:00",
            "whatchanged": "status"
        }"#;
        let entry: ActivityEntry = serde_json::from_str(json).unwrap();
        let activity = Activity::from(entry);
        assert_eq!(activity.person, "bob");
        assert_eq!(activity.what_changed, "status");
    }
}
