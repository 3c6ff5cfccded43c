//! Credential lookup and client construction.
//!
//! Credentials live in `.netrc`, keyed by the Jira host with an
//! `atlassian.net` entry as the shared fallback for Atlassian cloud sites
//! and the `default` block as a last resort.

use std::path::Path;

use anyhow::{Context, Result};
use fixver_core::JiraSettings;
use fixver_core::creds::Credentials;
use fixver_core::creds::netrc::{get_netrc_path, netrc_machines, parse_netrc, parse_netrc_default, read_netrc_file};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::client::{JiraClient, create_jira_client};
use crate::consts::REST_API_PATH;

/// Machine name tried when the host itself has no `.netrc` entry
const FALLBACK_MACHINE: &str = "atlassian.net";

/// Retrieve Jira credentials for `jira_host` from `~/.netrc`.
///
/// Machines are tried in order: `host:port` when a port is given, the bare
/// host, `atlassian.net`, then the `default` block.
pub fn get_jira_credentials(home: &Path, jira_host: &str) -> Result<Credentials> {
  let netrc_path = get_netrc_path(home);
  let mut machines = netrc_machines(jira_host);
  machines.push(FALLBACK_MACHINE.to_string());

  if netrc_path.exists() {
    let content = read_netrc_file(&netrc_path)?;
    for machine in &machines {
      if let Some(creds) = parse_netrc(&content, machine) {
        debug!("Using .netrc credentials for machine {}", machine);
        return Ok(creds);
      }
    }
    if let Some(creds) = parse_netrc_default(&content) {
      debug!("Using .netrc default credentials");
      return Ok(creds);
    }
  }

  let tried = machines.iter().map(|m| format!("'{m}'")).collect::<Vec<_>>().join(" or ");
  Err(anyhow::anyhow!(
    "Jira credentials not found in .netrc file. Please add credentials for machine {tried}."
  ))
}

/// REST API root for a Jira host
pub fn api_base_url(jira_host: &str) -> String {
  format!("{}{}", jira_host.trim_end_matches('/'), REST_API_PATH)
}

/// Creates an authenticated Jira client for resolved settings using
/// credentials from .netrc.
pub fn create_jira_client_from_netrc(home: &Path, settings: &JiraSettings) -> Result<JiraClient> {
  let host = settings.require_host()?;
  let project = settings.require_project()?;
  let credentials = get_jira_credentials(home, &host).context("Failed to get credentials")?;

  Ok(create_jira_client(
    &api_base_url(&host),
    &credentials.username,
    &credentials.password,
    project,
  ))
}

/// Creates a tokio runtime and an authenticated Jira client.
pub fn create_jira_runtime_and_client(home: &Path, settings: &JiraSettings) -> Result<(Runtime, JiraClient)> {
  let rt = Runtime::new().context("Failed to create async runtime")?;
  let client = create_jira_client_from_netrc(home, settings)?;
  Ok((rt, client))
}
