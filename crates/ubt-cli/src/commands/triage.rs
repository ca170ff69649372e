// SPDX-License-Identifier: Apache-2.0

//! Triage command - backlog count and updated-bug listing.

use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, warn};
use ubt_core::{
    AppConfig, BugSummary, DateWindow, FilterParams, LaunchpadClient, PackageTriage, TeamTriage,
    Triage,
};

use super::maybe_spinner;
use super::types::TriageReport;
use crate::cli::{OutputContext, TriageArgs};

/// Builds the filter parameters from CLI arguments over configured defaults.
///
/// `--status` replaces the configured statuses; `--ignore-user` extends the
/// configured ignore list.
pub fn filter_params(
    args: &TriageArgs,
    config: &AppConfig,
    today: chrono::NaiveDate,
) -> Result<FilterParams> {
    let window = DateWindow::parse(&args.since, today)?;

    let statuses = if args.statuses.is_empty() {
        config.triage.statuses.clone()
    } else {
        args.statuses.clone()
    };

    let mut ignore_users = config.triage.ignore_users.clone();
    for user in &args.ignore_users {
        if !ignore_users.contains(user) {
            ignore_users.push(user.clone());
        }
    }

    Ok(FilterParams::builder()
        .window(window)
        .statuses(statuses)
        .tags(args.tags.clone())
        .tags_combinator(args.tags_combinator())
        .ignore_users(ignore_users)
        .max_concurrent_fetches(config.launchpad.max_concurrent_fetches)
        .build())
}

/// Run a triage: count the backlog and list updated bugs.
pub async fn run(args: &TriageArgs, ctx: &OutputContext, config: &AppConfig) -> Result<TriageReport> {
    let name = args
        .name
        .clone()
        .unwrap_or_else(|| config.triage.default_name.clone());
    let params = filter_params(args, config, chrono::Utc::now().date_naive())?;
    let window = params.window;

    let client = LaunchpadClient::connect(&config.launchpad, args.anon)
        .context("Failed to connect to Launchpad")?;

    let spinner = maybe_spinner(ctx, &format!("Looking up {name}..."));
    let triage: Box<dyn Triage + '_> = if args.team {
        let blacklist = config.blacklist_sets();
        Box::new(TeamTriage::new(&client, &name, params, &blacklist).await?)
    } else {
        Box::new(PackageTriage::new(&client, &name, args.include_project, params).await?)
    };

    if let Some(s) = &spinner {
        s.set_message("Counting backlog...");
    }
    let backlog_count = triage.current_backlog_count().await?;

    if let Some(s) = &spinner {
        s.set_message("Fetching updated bugs...");
    }
    let bugs = triage.updated_bugs().await?;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    debug!(count = bugs.len(), backlog = backlog_count, "Triage finished");

    Ok(TriageReport {
        scope: triage.scope(),
        window,
        backlog_count,
        bugs,
    })
}

/// Opens each bug in the default web browser.
///
/// Failures are logged and do not abort the run.
pub fn open_in_browser(bugs: &[BugSummary]) {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    for bug in bugs {
        match Command::new(opener).arg(&bug.url).status() {
            Ok(status) if status.success() => debug!("Opened {}", bug.url),
            Ok(status) => warn!("{opener} exited with {status} for {}", bug.url),
            Err(e) => warn!("Failed to run {opener}: {e}"),
        }
    }
}
