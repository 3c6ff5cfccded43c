//! # Check Command
//!
//! Verifies that the configured host is reachable and accepts the stored
//! credentials.

use anyhow::{Context, Result};

use super::Session;
use crate::output::{print_info, print_success};

pub(super) fn handle_check_command(session: &Session) -> Result<()> {
  let settings = session.settings()?;
  let (rt, client) = session.connect(&settings)?;

  let endpoint = client.endpoint();
  print_info(&format!("Checking {} as {}", endpoint.base_url, endpoint.auth.username));

  let accepted = rt
    .block_on(client.test_connection())
    .context("Failed to reach Jira")?;

  if !accepted {
    anyhow::bail!(
      "Jira rejected the credentials for {}. Check the .netrc entry for this host.",
      endpoint.auth.username
    );
  }

  print_success("Jira connection OK");
  Ok(())
}
