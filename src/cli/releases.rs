//! # Releases Command
//!
//! Lists the versions defined on the configured project.

use anyhow::{Context, Result};
use clap::Args;
use fixver_jira::JiraRelease;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::Session;
use crate::output::print_info;

/// Arguments for the releases command
#[derive(Args)]
pub struct ReleasesArgs {
  /// Include archived releases
  #[arg(long, short = 'a')]
  pub all: bool,

  /// Only show releases that have not shipped yet
  #[arg(long, conflicts_with = "all")]
  pub unreleased: bool,
}

#[derive(Tabled)]
struct ReleaseRow {
  #[tabled(rename = "Name")]
  name: String,
  #[tabled(rename = "ID")]
  id: String,
  #[tabled(rename = "Status")]
  status: &'static str,
  #[tabled(rename = "Start")]
  start: String,
  #[tabled(rename = "Release")]
  release: String,
  #[tabled(rename = "Description")]
  description: String,
}

impl From<&JiraRelease> for ReleaseRow {
  fn from(release: &JiraRelease) -> Self {
    let status = if release.archived {
      "archived"
    } else if release.released {
      "released"
    } else if release.overdue {
      "overdue"
    } else {
      "unreleased"
    };

    Self {
      name: release.name.clone(),
      id: release.id.clone(),
      status,
      start: release.start().map(|date| date.to_string()).unwrap_or_default(),
      release: release.release().map(|date| date.to_string()).unwrap_or_default(),
      description: release.description.clone().unwrap_or_default(),
    }
  }
}

/// Keep the releases the flags ask for
fn select_releases(releases: Vec<JiraRelease>, args: &ReleasesArgs) -> Vec<JiraRelease> {
  releases
    .into_iter()
    .filter(|release| args.all || !release.archived)
    .filter(|release| !args.unreleased || !release.released)
    .collect()
}

pub(super) fn handle_releases_command(session: &Session, args: ReleasesArgs) -> Result<()> {
  let settings = session.settings()?;
  let (rt, client) = session.connect(&settings)?;

  let releases = rt
    .block_on(client.get_releases())
    .with_context(|| format!("Failed to list releases for project {}", client.project()))?;
  let releases = select_releases(releases, &args);

  if releases.is_empty() {
    print_info(&format!("No releases found for project {}", client.project()));
    return Ok(());
  }

  let rows: Vec<ReleaseRow> = releases.iter().map(ReleaseRow::from).collect();
  println!("{}", Table::new(rows).with(Style::sharp()));

  Ok(())
}
