// SPDX-License-Identifier: Apache-2.0

//! Launchpad OAuth authentication commands.

use anyhow::{Context, Result};
use console::style;
use dialoguer::Confirm;
use tracing::{debug, info};
use ubt_core::{Credentials, LaunchpadClient, LaunchpadConfig, TokenDance};

use crate::commands::types::AuthStatusResult;

/// Run the login command - authorize through the Launchpad website.
pub async fn run_login(config: &LaunchpadConfig) -> Result<()> {
    let path = config.credentials_path();
    if Credentials::load(&path)?.is_some() {
        println!(
            "{} Already authenticated with Launchpad ({}).",
            style("!").yellow().bold(),
            path.display()
        );
        println!(
            "Run {} to remove the credential file and re-authenticate.",
            style("ubuntu-bug-triage auth logout").cyan()
        );
        return Ok(());
    }

    println!(
        "{} Starting Launchpad authentication...",
        style("*").cyan().bold()
    );

    let dance = TokenDance::from_config(config)?;
    let request = dance
        .request_token()
        .await
        .context("Failed to obtain a request token")?;

    println!();
    println!("Open this URL in your browser and authorize access:");
    println!("  {}", style(dance.authorize_url(&request)).cyan().underlined());
    println!();

    let authorized = Confirm::new()
        .with_prompt("Have you authorized access on Launchpad?")
        .default(true)
        .interact()
        .context("Failed to read confirmation")?;
    if !authorized {
        println!("{} Login cancelled.", style("!").yellow().bold());
        return Ok(());
    }

    let credentials = dance
        .exchange(&request)
        .await
        .context("Failed to exchange the request token")?;
    credentials.save(&path)?;
    debug!("Credentials written to {}", path.display());

    println!();
    println!(
        "{} Successfully authenticated with Launchpad!",
        style("*").green().bold()
    );
    Ok(())
}

/// Run the logout command - remove the credential file.
pub fn run_logout(config: &LaunchpadConfig) -> Result<()> {
    let path = config.credentials_path();
    if !Credentials::delete(&path)? {
        println!(
            "{} No credential file at {}.",
            style("!").yellow().bold(),
            path.display()
        );
        return Ok(());
    }

    info!("Logged out from Launchpad");
    println!(
        "{} Logged out from Launchpad. Removed {}.",
        style("*").green().bold(),
        path.display()
    );
    Ok(())
}

/// Run the status command - show current authentication state.
pub async fn run_status(config: &LaunchpadConfig) -> Result<AuthStatusResult> {
    let path = config.credentials_path();
    let credentials_file = path.display().to_string();

    let Some(credentials) = Credentials::load(&path)? else {
        return Ok(AuthStatusResult {
            authenticated: false,
            credentials_file,
            username: None,
        });
    };

    let username = match LaunchpadClient::new(config, Some(credentials)) {
        Ok(client) => client
            .me()
            .await
            .inspect_err(|e| debug!("Could not look up current user: {e}"))
            .ok(),
        Err(_) => None,
    };

    Ok(AuthStatusResult {
        authenticated: true,
        credentials_file,
        username,
    })
}
