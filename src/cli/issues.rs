//! # Issue Commands
//!
//! Release search, single-issue lookup, and issue creation and update.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use fixver_jira::consts::CUSTOM_FIELD_PREFIX;
use fixver_jira::{CustomFields, JiraIssue, JiraIssueInput, JiraIssueType, JiraProject, JiraRelease};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::Session;
use crate::output::{print_info, print_success, print_warning};

/// Arguments for the issues command
#[derive(Args)]
pub struct IssuesArgs {
  /// Release (fix version) name
  #[arg(required = true, index = 1)]
  pub release: String,

  /// Issue fields to request, replacing the configured or default list
  #[arg(long, value_delimiter = ',', value_name = "FIELD")]
  pub fields: Vec<String>,

  /// Print the issues as JSON keyed by issue key
  #[arg(long)]
  pub json: bool,
}

/// Arguments for the issue command
#[derive(Args)]
pub struct IssueArgs {
  /// Issue key or id (e.g., PROJ-123)
  #[arg(required = true, index = 1)]
  pub key: String,

  /// Extra detail to expand (e.g., renderedFields,names)
  #[arg(long, value_delimiter = ',', value_name = "EXPAND")]
  pub expand: Vec<String>,
}

/// Fields shared by the create and update commands
#[derive(Args)]
pub struct FieldArgs {
  /// Issue description
  #[arg(long, short = 'd')]
  pub description: Option<String>,

  /// Release (fix version) to assign; repeat for several
  #[arg(long = "release", short = 'r', value_name = "NAME")]
  pub releases: Vec<String>,

  /// Custom field value as customfield_<n>=<value>; repeat for several
  #[arg(long = "custom", short = 'c', value_name = "FIELD=VALUE", value_parser = parse_custom_field)]
  pub custom: Vec<(String, String)>,
}

/// Arguments for the create command
#[derive(Args)]
pub struct CreateArgs {
  /// Issue summary
  #[arg(long, short = 's')]
  pub summary: String,

  /// Issue type name
  #[arg(long = "type", short = 't', default_value = "Task")]
  pub issue_type: String,

  #[command(flatten)]
  pub fields: FieldArgs,
}

/// Arguments for the update command
#[derive(Args)]
pub struct UpdateArgs {
  /// Issue key (e.g., PROJ-123)
  #[arg(required = true, index = 1)]
  pub key: String,

  /// New summary
  #[arg(long, short = 's')]
  pub summary: Option<String>,

  /// New issue type name
  #[arg(long = "type", short = 't')]
  pub issue_type: Option<String>,

  #[command(flatten)]
  pub fields: FieldArgs,
}

#[derive(Tabled)]
struct IssueRow {
  #[tabled(rename = "Key")]
  key: String,
  #[tabled(rename = "Type")]
  issue_type: String,
  #[tabled(rename = "Status")]
  status: String,
  #[tabled(rename = "Summary")]
  summary: String,
  #[tabled(rename = "Custom Fields")]
  custom: String,
}

impl From<&JiraIssue> for IssueRow {
  fn from(issue: &JiraIssue) -> Self {
    let fields = &issue.fields;
    let custom = fields
      .custom_fields
      .iter()
      .filter(|(_, value)| !value.is_empty())
      .map(|(name, value)| format!("{}={}", issue.names.get(name).unwrap_or(name), value))
      .collect::<Vec<_>>()
      .join("\n");

    Self {
      key: issue.key.clone(),
      issue_type: fields.issue_type.as_ref().map(|t| t.name.clone()).unwrap_or_default(),
      status: fields.status.as_ref().map(|s| s.name.clone()).unwrap_or_default(),
      summary: fields.summary.clone(),
      custom,
    }
  }
}

/// Parse a `customfield_<n>=<value>` argument
fn parse_custom_field(raw: &str) -> std::result::Result<(String, String), String> {
  let (name, value) = raw
    .split_once('=')
    .ok_or_else(|| format!("expected {CUSTOM_FIELD_PREFIX}<n>=<value>, got '{raw}'"))?;
  let name = name.trim();

  let suffix = name.strip_prefix(CUSTOM_FIELD_PREFIX).unwrap_or_default();
  if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
    return Err(format!("'{name}' is not a custom field id like {CUSTOM_FIELD_PREFIX}10010"));
  }

  Ok((name.to_string(), value.to_string()))
}

impl FieldArgs {
  fn is_empty(&self) -> bool {
    self.description.is_none() && self.releases.is_empty() && self.custom.is_empty()
  }

  fn apply(self, input: &mut JiraIssueInput) {
    input.description = self.description.unwrap_or_default();
    input.fix_versions = self.releases.iter().map(|name| JiraRelease::named(name)).collect();
    input.custom_fields = self.custom.into_iter().collect::<CustomFields>();
  }
}

fn create_input(project: &str, args: CreateArgs) -> JiraIssueInput {
  let mut input = JiraIssueInput {
    project: Some(JiraProject::with_key(project)),
    summary: args.summary,
    issue_type: Some(JiraIssueType::named(&args.issue_type)),
    ..Default::default()
  };
  args.fields.apply(&mut input);
  input
}

fn update_input(args: UpdateArgs) -> Result<JiraIssueInput> {
  if args.summary.is_none() && args.issue_type.is_none() && args.fields.is_empty() {
    anyhow::bail!("Nothing to update for {}; pass at least one field", args.key);
  }

  let mut input = JiraIssueInput {
    summary: args.summary.unwrap_or_default(),
    issue_type: args.issue_type.as_deref().map(JiraIssueType::named),
    ..Default::default()
  };
  args.fields.apply(&mut input);
  Ok(input)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  let mut stdout = io::stdout().lock();
  serde_json::to_writer_pretty(&mut stdout, value).context("Failed to write JSON output")?;
  writeln!(stdout)?;
  Ok(())
}

pub(super) fn handle_issues_command(session: &Session, args: IssuesArgs) -> Result<()> {
  let settings = session.settings()?;
  let (rt, client) = session.connect(&settings)?;

  let mut release = JiraRelease::named(&args.release);
  if !args.fields.is_empty() {
    release = release.with_issue_fields(args.fields);
  } else if let Some(fields) = settings.search_fields {
    release = release.with_issue_fields(fields);
  }

  let issues = rt
    .block_on(client.search_issues(&release))
    .with_context(|| format!("Failed to search issues for release {}", args.release))?;

  if args.json {
    return print_json(&issues);
  }

  if issues.is_empty() {
    print_warning(&format!("No issues found for release {}", args.release));
    return Ok(());
  }

  let rows: Vec<IssueRow> = issues.values().map(IssueRow::from).collect();
  println!("{}", Table::new(rows).with(Style::sharp()));

  Ok(())
}

pub(super) fn handle_issue_command(session: &Session, args: IssueArgs) -> Result<()> {
  let settings = session.settings()?;
  let (rt, client) = session.connect(&settings)?;

  let issue = rt
    .block_on(client.get_issue(&args.key, &args.expand))
    .with_context(|| format!("Failed to fetch issue {}", args.key))?;

  print_json(&issue)
}

pub(super) fn handle_create_command(session: &Session, args: CreateArgs) -> Result<()> {
  let settings = session.settings()?;
  let (rt, client) = session.connect(&settings)?;

  let input = create_input(client.project(), args);
  let issue = rt
    .block_on(client.create_issue(input))
    .context("Failed to create issue")?;

  print_success(&format!("Created issue {}", issue.key));
  if !issue.self_url.is_empty() {
    print_info(&issue.self_url);
  }

  Ok(())
}

pub(super) fn handle_update_command(session: &Session, args: UpdateArgs) -> Result<()> {
  let key = args.key.clone();
  let input = update_input(args)?;

  let settings = session.settings()?;
  let (rt, client) = session.connect(&settings)?;

  rt.block_on(client.update_issue(&key, &input))
    .with_context(|| format!("Failed to update issue {key}"))?;

  print_success(&format!("Updated issue {key}"));
  Ok(())
}
