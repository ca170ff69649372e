// SPDX-License-Identifier: Apache-2.0

//! Output rendering for triage reports and auth status.
//!
//! Text and markdown are written by each result type; JSON and YAML come
//! straight from its `Serialize` impl so scripts see every field.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, Write};

use crate::cli::{OutputContext, OutputFormat};

/// A command result printable in every `--output` format.
pub trait Renderable: Serialize {
    /// Human-readable text.
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()>;

    /// Markdown, for pasting into reports. Defaults to text.
    fn render_markdown(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        self.render_text(w, ctx)
    }
}

/// Writes `result` to stdout in the format selected by `ctx`.
pub fn render<T: Renderable>(result: &T, ctx: &OutputContext) -> Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    render_to(result, ctx, &mut lock)?;
    lock.flush().context("Failed to flush output")
}

/// Writes `result` to `w` in the format selected by `ctx`.
pub fn render_to<T: Renderable>(
    result: &T,
    ctx: &OutputContext,
    w: &mut dyn Write,
) -> Result<()> {
    match ctx.format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(result).context("Failed to serialize to JSON")?;
            writeln!(w, "{json}").context("Failed to write JSON")?;
        }
        OutputFormat::Yaml => {
            let yaml = serde_saphyr::to_string(result).context("Failed to serialize to YAML")?;
            write!(w, "{yaml}").context("Failed to write YAML")?;
        }
        OutputFormat::Markdown => result
            .render_markdown(w, ctx)
            .context("Failed to render markdown")?,
        OutputFormat::Text => result
            .render_text(w, ctx)
            .context("Failed to render text")?,
    }
    Ok(())
}

mod auth;
mod triage;
