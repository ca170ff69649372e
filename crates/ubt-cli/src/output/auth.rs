// SPDX-License-Identifier: Apache-2.0

use console::style;
use std::io::{self, Write};

use crate::cli::OutputContext;
use crate::commands::types::AuthStatusResult;

use super::Renderable;

impl Renderable for AuthStatusResult {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        writeln!(w)?;
        if self.authenticated {
            writeln!(w, "{} Authenticated with Launchpad", style("*").green().bold())?;
            writeln!(w, "  Credentials: {}", style(&self.credentials_file).cyan())?;
            match self.username {
                Some(ref username) => writeln!(w, "  Username: {}", style(username).cyan())?,
                None => writeln!(w, "  Username: {}", style("unavailable").dim())?,
            }
        } else {
            writeln!(
                w,
                "{} Not authenticated. Run {} to authenticate.",
                style("!").yellow().bold(),
                style("ubuntu-bug-triage auth login").cyan()
            )?;
        }
        writeln!(w)?;
        Ok(())
    }

    fn render_markdown(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        writeln!(w, "## Authentication Status\n")?;
        if self.authenticated {
            writeln!(w, "**Status:** Authenticated")?;
            writeln!(w, "**Credentials:** `{}`", self.credentials_file)?;
            if let Some(ref username) = self.username {
                writeln!(w, "**Username:** {username}")?;
            }
        } else {
            writeln!(w, "**Status:** Not authenticated")?;
        }
        Ok(())
    }
}
