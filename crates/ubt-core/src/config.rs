// SPDX-License-Identifier: Apache-2.0

//! Configuration management for ubuntu-bug-triage.
//!
//! Provides layered configuration from files and environment variables.
//! Uses XDG-compliant paths with environment variable support.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `UBT_`)
//! 2. Config file: `~/.config/ubuntu-bug-triage/config.toml`
//! 3. Built-in defaults
//!
//! # Examples
//!
//! ```bash
//! # Talk to the Launchpad staging instance
//! UBT_LAUNCHPAD__API_ROOT=https://api.staging.launchpad.net/devel/ ubuntu-bug-triage
//! ```
//!
//! ```toml
//! [triage]
//! ignore_users = ["janitor", "ubuntu-server-bot"]
//!
//! [blacklist]
//! ubuntu-server = ["cloud-init", "curtin"]
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::TriageError;

/// Directory and file-name component shared by config and credential paths.
const APP_NAME: &str = "ubuntu-bug-triage";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Launchpad connection settings.
    pub launchpad: LaunchpadConfig,
    /// Triage defaults.
    pub triage: TriageConfig,
    /// Team name to packages whose bugs are skipped in team triage.
    pub blacklist: HashMap<String, Vec<String>>,
}

impl AppConfig {
    /// Returns the blacklist as team name to package set.
    #[must_use]
    pub fn blacklist_sets(&self) -> HashMap<String, BTreeSet<String>> {
        self.blacklist
            .iter()
            .map(|(team, pkgs)| (team.clone(), pkgs.iter().cloned().collect()))
            .collect()
    }
}

/// Launchpad connection settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LaunchpadConfig {
    /// Web service root, including the API version.
    pub api_root: String,
    /// Web root used for the OAuth token dance.
    pub web_root: String,
    /// Distribution whose packages and teams are triaged.
    pub distribution: String,
    /// OAuth consumer key sent with every request.
    pub consumer_key: String,
    /// Credential file; `~` is expanded. Defaults to `~/.lp_creds`.
    pub credentials_file: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Bug details fetched in parallel while listing updated bugs.
    pub max_concurrent_fetches: usize,
}

impl Default for LaunchpadConfig {
    fn default() -> Self {
        Self {
            api_root: "https://api.launchpad.net/devel/".to_string(),
            web_root: "https://launchpad.net/".to_string(),
            distribution: "ubuntu".to_string(),
            consumer_key: APP_NAME.to_string(),
            credentials_file: None,
            timeout_seconds: 30,
            max_concurrent_fetches: 5,
        }
    }
}

impl LaunchpadConfig {
    /// Resolves the credential file location.
    #[must_use]
    pub fn credentials_path(&self) -> PathBuf {
        match &self.credentials_file {
            Some(path) => expand_home(path),
            None => home_dir().join(".lp_creds"),
        }
    }
}

/// Triage defaults, overridable on the command line.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Package or team triaged when no name is given.
    pub default_name: String,
    /// Task statuses searched when no `--status` is given.
    pub statuses: Vec<String>,
    /// Users whose activity does not count as triage.
    pub ignore_users: Vec<String>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            default_name: "ubuntu-server".to_string(),
            statuses: [
                "New",
                "Incomplete",
                "Confirmed",
                "Triaged",
                "In Progress",
                "Fix Committed",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            ignore_users: vec!["janitor".to_string()],
        }
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().expect("Could not determine home directory - is HOME set?")
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

/// Returns the configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/ubuntu-bug-triage`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join(APP_NAME);
    }
    home_dir().join(".config").join(APP_NAME)
}

/// Returns the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load application configuration.
///
/// Loads from config file (if exists) and environment variables.
/// Environment variables use the prefix `UBT_` and double underscore
/// for nested keys (e.g., `UBT_LAUNCHPAD__TIMEOUT_SECONDS`).
///
/// # Errors
///
/// Returns `TriageError::Config` if the config file exists but is invalid.
pub fn load_config() -> Result<AppConfig, TriageError> {
    let config_path = config_file_path();

    let config = Config::builder()
        .add_source(File::with_name(config_path.to_string_lossy().as_ref()).required(false))
        .add_source(
            Environment::with_prefix("UBT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    Ok(app_config)
}
