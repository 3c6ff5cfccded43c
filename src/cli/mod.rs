//! # Command Line Interface
//!
//! Defines the CLI structure and dispatches each subcommand to its handler.
//! Connection settings are resolved once per invocation from `jira.toml`,
//! the environment and the global flags, in that order of precedence.

mod check;
mod issues;
mod releases;
mod transitions;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use directories::BaseDirs;
use fixver_core::{JiraSettings, get_config_dirs};
use fixver_jira::{JiraClient, create_jira_runtime_and_client};
use tokio::runtime::Runtime;
use tracing::debug;

/// Top-level CLI command for the fixver tool
#[derive(Parser)]
#[command(name = "fixver")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Query Jira releases and the issues assigned to them")]
#[command(
  long_about = "fixver talks to the Jira REST API on behalf of one project.\n\n\
        It lists the project's releases (fix versions), shows the issues assigned\n\
        to a release, and creates or updates issues including custom fields.\n\n\
        Credentials are read from ~/.netrc for the Jira host, falling back to an\n\
        'atlassian.net' entry."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages, including every request\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Jira host, e.g. company.atlassian.net (overrides JIRA_HOST)
  #[arg(long, global = true, value_name = "HOST")]
  pub host: Option<String>,

  /// Project key (overrides JIRA_PROJECT)
  #[arg(long, global = true, value_name = "KEY")]
  pub project: Option<String>,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for the fixver tool
#[derive(Subcommand)]
pub enum Commands {
  /// Verify the Jira connection and credentials
  #[command(long_about = "Verify the Jira connection by fetching the current user.\n\n\
            Reports whether the configured credentials are accepted. Other\n\
            failures, such as an unreachable host, are returned as errors.")]
  Check,

  /// Create an issue
  #[command(long_about = "Create an issue in the configured project.\n\n\
            Custom fields are given as customfield_<n>=<value> pairs and are sent\n\
            as option values.")]
  Create(issues::CreateArgs),

  /// Show the issues assigned to a release
  #[command(alias = "search")]
  Issues(issues::IssuesArgs),

  /// Show a single issue as JSON
  Issue(issues::IssueArgs),

  /// List the project's releases
  #[command(alias = "versions")]
  Releases(releases::ReleasesArgs),

  /// Move an issue through its workflow
  Transition(transitions::TransitionArgs),

  /// List the transitions available for an issue
  Transitions(transitions::TransitionsArgs),

  /// Update the fields of an issue
  #[command(long_about = "Update the fields of an existing issue.\n\n\
            Only the fields given on the command line are sent.")]
  Update(issues::UpdateArgs),
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  let flags = JiraSettings {
    host: cli.host,
    project: cli.project,
    search_fields: None,
  };
  let session = Session::new(flags);

  match cli.command {
    Commands::Check => check::handle_check_command(&session),
    Commands::Create(args) => issues::handle_create_command(&session, args),
    Commands::Issues(args) => issues::handle_issues_command(&session, args),
    Commands::Issue(args) => issues::handle_issue_command(&session, args),
    Commands::Releases(args) => releases::handle_releases_command(&session, args),
    Commands::Transition(args) => transitions::handle_transition_command(&session, args),
    Commands::Transitions(args) => transitions::handle_transitions_command(&session, args),
    Commands::Update(args) => issues::handle_update_command(&session, args),
  }
}

/// Command-line overrides applied on top of `jira.toml` and the environment
pub struct Session {
  flags: JiraSettings,
}

impl Session {
  const fn new(flags: JiraSettings) -> Self {
    Self { flags }
  }

  /// Merge `jira.toml`, the environment and the command-line flags
  pub fn settings(&self) -> Result<JiraSettings> {
    let file = get_config_dirs()?.load_jira_settings()?;
    let settings = file.merge(JiraSettings::from_env()).merge(self.flags.clone());
    debug!("Resolved Jira settings: {:?}", settings);
    Ok(settings)
  }

  /// Build a runtime and an authenticated client for the resolved settings
  pub fn connect(&self, settings: &JiraSettings) -> Result<(Runtime, JiraClient)> {
    create_jira_runtime_and_client(&home_dir()?, settings)
  }
}

fn home_dir() -> Result<PathBuf> {
  let base_dirs = BaseDirs::new().context("Failed to get $HOME directory")?;
  Ok(base_dirs.home_dir().to_path_buf())
}
