// SPDX-License-Identifier: Apache-2.0

//! Command handlers for the ubuntu-bug-triage CLI.

pub mod auth;
pub mod completion;
pub mod triage;
pub mod types;

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use ubt_core::AppConfig;

use crate::cli::{AuthCommand, Commands, OutputContext, TriageArgs};
use crate::output;

/// Creates a styled spinner (only if interactive).
fn maybe_spinner(ctx: &OutputContext, message: &str) -> Option<ProgressBar> {
    if ctx.is_interactive() {
        let s = ProgressBar::new_spinner();
        s.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid spinner template"),
        );
        s.set_message(message.to_string());
        s.enable_steady_tick(Duration::from_millis(100));
        Some(s)
    } else {
        None
    }
}

/// Dispatch to the appropriate command handler.
pub async fn run(
    command: Option<Commands>,
    args: TriageArgs,
    ctx: OutputContext,
    config: &AppConfig,
) -> Result<()> {
    match command {
        None => {
            let report = triage::run(&args, &ctx, config).await?;
            output::render(&report, &ctx)?;
            if args.open {
                triage::open_in_browser(&report.bugs);
            }
            Ok(())
        }

        Some(Commands::Auth(auth_cmd)) => match auth_cmd {
            AuthCommand::Login => auth::run_login(&config.launchpad).await,
            AuthCommand::Logout => auth::run_logout(&config.launchpad),
            AuthCommand::Status => {
                let spinner = maybe_spinner(&ctx, "Checking credentials...");
                let result = auth::run_status(&config.launchpad).await;
                if let Some(s) = spinner {
                    s.finish_and_clear();
                }
                output::render(&result?, &ctx)
            }
        },

        Some(Commands::Completion { shell }) => completion::run_generate(shell),
    }
}
