//! # Jira Search Endpoints
//!
//! Finds the issues scheduled for a release with a single JQL search.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument};
use url::form_urlencoded;

use crate::client::JiraClient;
use crate::consts::DEFAULT_SEARCH_FIELDS;
use crate::error::Result;
use crate::models::{JiraIssue, JiraRelease, JiraSearchResults};

/// Build the JQL selecting the issues of a project release
pub fn release_jql(project: &str, release_name: &str) -> String {
  format!(r#"project = {project} AND fixVersion = "{release_name}""#)
}

/// The comma-separated field list to request for a release
fn search_fields(release: &JiraRelease) -> String {
  match &release.issue_fields {
    Some(fields) => fields.join(","),
    None => DEFAULT_SEARCH_FIELDS.join(","),
  }
}

impl JiraClient {
  /// Get the issues of a release, keyed by issue key
  ///
  /// Only the first page of search results is read.
  #[instrument(skip(self, release), fields(release = %release.name), level = "debug")]
  pub async fn search_issues(&self, release: &JiraRelease) -> Result<BTreeMap<String, JiraIssue>> {
    let jql = release_jql(self.project(), &release.name);
    debug!("Searching issues with JQL: {}", jql);

    let query = form_urlencoded::Serializer::new(String::new())
      .append_pair("jql", &jql)
      .append_pair("fields", &search_fields(release))
      .finish();
    let path = format!("/search?{query}");

    let results: JiraSearchResults = self.get_json(&path, "issue search results").await?;

    let issues: BTreeMap<String, JiraIssue> = results
      .issues
      .into_iter()
      .map(|issue| (issue.key.clone(), issue))
      .collect();
    info!("Found {} issues for release {}", issues.len(), release.name);

    Ok(issues)
  }
}
