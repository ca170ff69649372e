// SPDX-License-Identifier: Apache-2.0

use console::style;
use std::io::{self, Write};
use ubt_core::{BugSummary, DateWindow, truncate};

use crate::cli::OutputContext;
use crate::commands::types::TriageReport;

use super::Renderable;

/// Longest title shown in text output.
const MAX_TITLE_CHARS: usize = 72;

/// "since 2024-03-09" or "between 2024-03-01 and 2024-03-05".
fn describe_window(window: &DateWindow) -> String {
    let since = window.since.format("%Y-%m-%d");
    match window.until {
        Some(until) => {
            // `until` is exclusive; show the last included day.
            let last = until - chrono::Duration::days(1);
            format!("between {since} and {}", last.format("%Y-%m-%d"))
        }
        None => format!("since {since}"),
    }
}

/// Comma-separated source packages of a bug, deduplicated in task order.
fn packages(bug: &BugSummary) -> String {
    let mut pkgs: Vec<&str> = Vec::new();
    for pkg in bug.src_pkgs() {
        if !pkgs.contains(&pkg) {
            pkgs.push(pkg);
        }
    }
    pkgs.join(", ")
}

impl Renderable for TriageReport {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        writeln!(
            w,
            "{} {} bug(s) in {} updated {}",
            style("*").cyan().bold(),
            style(self.bugs.len()).bold(),
            self.scope,
            describe_window(&self.window)
        )?;
        writeln!(w, "  Open backlog: {}", style(self.backlog_count).bold())?;

        if self.bugs.is_empty() {
            return Ok(());
        }
        writeln!(w)?;

        for bug in &self.bugs {
            writeln!(
                w,
                "{} {} {}",
                style(format!("LP: #{:<8}", bug.id)).cyan(),
                style(format!("[{}]", packages(bug))).dim(),
                truncate(&bug.title, MAX_TITLE_CHARS)
            )?;
            if ctx.verbose {
                let who = bug.last_active_user.as_deref().unwrap_or("unknown");
                writeln!(
                    w,
                    "    {}  last: {} {}",
                    bug.short_url,
                    who,
                    style(bug.date_last_updated.format("%Y-%m-%d %H:%M")).dim()
                )?;
            } else {
                writeln!(w, "    {}", bug.short_url)?;
            }
        }
        Ok(())
    }

    fn render_markdown(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        writeln!(
            w,
            "## Bugs in {} updated {}\n",
            self.scope,
            describe_window(&self.window)
        )?;
        writeln!(w, "**Open backlog:** {}\n", self.backlog_count)?;

        if self.bugs.is_empty() {
            writeln!(w, "No updated bugs.")?;
            return Ok(());
        }

        writeln!(w, "| Bug | Packages | Title | Last active |")?;
        writeln!(w, "|-----|----------|-------|-------------|")?;
        for bug in &self.bugs {
            writeln!(
                w,
                "| [LP: #{}]({}) | {} | {} | {} |",
                bug.id,
                bug.url,
                packages(bug),
                bug.title.replace('|', "\\|"),
                bug.last_active_user.as_deref().unwrap_or("")
            )?;
        }
        Ok(())
    }
}
