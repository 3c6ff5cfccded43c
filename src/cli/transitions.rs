//! # Transition Commands
//!
//! Lists the workflow transitions of an issue and applies one by name or id.

use anyhow::{Context, Result};
use clap::Args;
use fixver_jira::JiraTransition;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::Session;
use crate::output::{print_info, print_success};

/// Arguments for the transitions command
#[derive(Args)]
pub struct TransitionsArgs {
  /// Issue key (e.g., PROJ-123)
  #[arg(required = true, index = 1)]
  pub key: String,
}

/// Arguments for the transition command
#[derive(Args)]
pub struct TransitionArgs {
  /// Issue key (e.g., PROJ-123)
  #[arg(required = true, index = 1)]
  pub key: String,

  /// Transition name or id
  #[arg(required = true, index = 2)]
  pub transition: String,
}

#[derive(Tabled)]
struct TransitionRow<'a> {
  #[tabled(rename = "ID")]
  id: &'a str,
  #[tabled(rename = "Name")]
  name: &'a str,
}

fn transitions_table(transitions: &[JiraTransition]) -> String {
  let rows = transitions.iter().map(|t| TransitionRow {
    id: &t.id,
    name: &t.name,
  });
  Table::new(rows).with(Style::sharp()).to_string()
}

/// Find a transition by id or case-insensitive name
fn find_transition<'a>(transitions: &'a [JiraTransition], wanted: &str) -> Option<&'a JiraTransition> {
  transitions
    .iter()
    .find(|t| t.id == wanted)
    .or_else(|| transitions.iter().find(|t| t.name.eq_ignore_ascii_case(wanted)))
}

pub(super) fn handle_transitions_command(session: &Session, args: TransitionsArgs) -> Result<()> {
  let settings = session.settings()?;
  let (rt, client) = session.connect(&settings)?;

  let transitions = rt
    .block_on(client.get_transitions(&args.key))
    .with_context(|| format!("Failed to fetch transitions for {}", args.key))?;

  if transitions.is_empty() {
    print_info(&format!("No transitions available for issue {}", args.key));
    return Ok(());
  }

  println!("{}", transitions_table(&transitions));
  Ok(())
}

pub(super) fn handle_transition_command(session: &Session, args: TransitionArgs) -> Result<()> {
  let settings = session.settings()?;
  let (rt, client) = session.connect(&settings)?;

  rt.block_on(async {
    let transitions = client
      .get_transitions(&args.key)
      .await
      .with_context(|| format!("Failed to fetch transitions for {}", args.key))?;

    let Some(transition) = find_transition(&transitions, &args.transition) else {
      anyhow::bail!(
        "Transition '{}' not found for issue {}. Available transitions:\n{}",
        args.transition,
        args.key,
        transitions_table(&transitions)
      );
    };

    client
      .transition_issue(&args.key, &transition.id)
      .await
      .with_context(|| format!("Failed to transition issue {}", args.key))?;

    print_success(&format!("Transitioned issue {} to '{}'", args.key, transition.name));
    Ok::<_, anyhow::Error>(())
  })
}
