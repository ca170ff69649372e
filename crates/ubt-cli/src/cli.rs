// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for ubuntu-bug-triage.
//!
//! Uses clap's derive API. Running without a subcommand triages a package
//! (or, with `--team`, a team); `auth` and `completion` are auxiliary.

use std::io::IsTerminal;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use ubt_core::TagCombinator;

/// Extended help text for the completion subcommand with shell-specific examples.
const COMPLETION_HELP: &str = r#"EXAMPLES

  bash
    Add to ~/.bashrc or ~/.bash_profile:
      eval "$(ubuntu-bug-triage completion bash)"

  zsh
    Generate completion file:
      mkdir -p ~/.zsh/completions
      ubuntu-bug-triage completion zsh > ~/.zsh/completions/_ubuntu-bug-triage

    Add to ~/.zshrc (before compinit):
      fpath=(~/.zsh/completions $fpath)
      autoload -U compinit && compinit -i

  fish
    ubuntu-bug-triage completion fish > ~/.config/fish/completions/ubuntu-bug-triage.fish
"#;

/// Output format for CLI results.
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with colors (default)
    #[default]
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// YAML output for programmatic consumption
    Yaml,
    /// Markdown output for reports and mailing lists
    Markdown,
}

/// Global output configuration passed to commands.
#[derive(Clone)]
pub struct OutputContext {
    /// Output format (text, json, yaml, markdown)
    pub format: OutputFormat,
    /// Suppress non-essential output (spinners, progress)
    pub quiet: bool,
    /// Enable verbose output
    pub verbose: bool,
    /// Whether stdout is a terminal (TTY)
    pub is_tty: bool,
}

impl OutputContext {
    /// Creates an `OutputContext` from CLI arguments.
    pub fn from_cli(format: OutputFormat, quiet: bool, verbose: bool) -> Self {
        Self {
            format,
            quiet,
            verbose,
            is_tty: std::io::stdout().is_terminal(),
        }
    }

    /// Returns true if interactive elements (spinners, colors) should be shown.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && !self.quiet && matches!(self.format, OutputFormat::Text)
    }
}

/// Identify Launchpad bugs that need triage.
///
/// Lists bugs of an Ubuntu source package (optionally with its upstream
/// project) or of a team's subscribed packages that changed recently, and
/// reports the open backlog.
#[derive(Parser)]
#[command(name = "ubuntu-bug-triage")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Output format (text, json, yaml, markdown)
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    pub output: OutputFormat,

    /// Suppress non-essential output (spinners, progress)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Enable debug-level logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Triage options (used when no subcommand is given)
    #[command(flatten)]
    pub triage: TriageArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options for a triage run.
#[derive(Args, Debug, Clone)]
pub struct TriageArgs {
    /// Package or team name [default: from config, ubuntu-server]
    pub name: Option<String>,

    /// Days back, a date (YYYY-MM-DD) or a range (YYYY-MM-DD..YYYY-MM-DD)
    #[arg(default_value = "1")]
    pub since: String,

    /// Treat NAME as a Launchpad team
    #[arg(long)]
    pub team: bool,

    /// Also search the upstream project with the same name
    #[arg(long)]
    pub include_project: bool,

    /// Tag to search for; prefix with '-' to exclude (repeatable)
    #[arg(
        short = 't',
        long = "tag",
        value_name = "TAG",
        action = ArgAction::Append,
        allow_hyphen_values = true
    )]
    pub tags: Vec<String>,

    /// Match bugs with any of the tags instead of all of them
    #[arg(long)]
    pub any_tag: bool,

    /// Task status to search (repeatable, replaces the default set)
    #[arg(short = 's', long = "status", value_name = "STATUS", action = ArgAction::Append)]
    pub statuses: Vec<String>,

    /// Ignore bugs last touched by this user (repeatable)
    #[arg(long = "ignore-user", value_name = "USER", action = ArgAction::Append)]
    pub ignore_users: Vec<String>,

    /// Connect to Launchpad anonymously
    #[arg(long)]
    pub anon: bool,

    /// Open each bug in the web browser
    #[arg(long)]
    pub open: bool,
}

impl TriageArgs {
    /// How the requested tags combine.
    pub fn tags_combinator(&self) -> TagCombinator {
        if self.any_tag {
            TagCombinator::Any
        } else {
            TagCombinator::All
        }
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage Launchpad authentication
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Generate a shell completion script (output to stdout)
    #[command(after_long_help = COMPLETION_HELP)]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Authentication subcommands
#[derive(Subcommand)]
pub enum AuthCommand {
    /// Authorize this tool through the Launchpad website
    Login,

    /// Remove the stored credential file
    Logout,

    /// Show current authentication status
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ubuntu-bug-triage").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_tag_defaults() {
        let cli = parse(&[]);
        assert!(cli.triage.tags.is_empty());
        assert_eq!(cli.triage.tags_combinator(), TagCombinator::All);
        assert_eq!(cli.triage.since, "1");
        assert!(cli.triage.name.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_tags_parse_all_spellings() {
        let cli = parse(&[
            "--any-tag",
            "-t",
            "foo",
            "-tbar",
            "--tag",
            "baz",
            "-t-notfoo",
            "-t=-notbar",
            "--tag=-notbaz",
        ]);
        assert_eq!(
            cli.triage.tags,
            vec!["foo", "bar", "baz", "-notfoo", "-notbar", "-notbaz"]
        );
        assert_eq!(cli.triage.tags_combinator(), TagCombinator::Any);
    }

    #[test]
    fn test_positionals_and_flags() {
        let cli = parse(&[
            "--team",
            "ubuntu-server",
            "2024-03-01..2024-03-05",
            "-s",
            "New",
            "--status",
            "Confirmed",
            "--ignore-user",
            "bot",
        ]);
        assert!(cli.triage.team);
        assert_eq!(cli.triage.name.as_deref(), Some("ubuntu-server"));
        assert_eq!(cli.triage.since, "2024-03-01..2024-03-05");
        assert_eq!(cli.triage.statuses, vec!["New", "Confirmed"]);
        assert_eq!(cli.triage.ignore_users, vec!["bot"]);
    }

    #[test]
    fn test_auth_subcommand() {
        let cli = parse(&["auth", "status"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Auth(AuthCommand::Status))
        ));
    }
}
