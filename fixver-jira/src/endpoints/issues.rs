//! # Jira Issue Endpoints
//!
//! Jira API endpoint implementations for issue operations,
//! including fetching, creating, and updating Jira issues.

use reqwest::Method;
use tracing::{info, instrument};
use url::form_urlencoded;

use super::{encode_segment, require_issue_key};
use crate::client::{JiraClient, encode_body};
use crate::error::{JiraError, Result};
use crate::models::{CreateIssueRequest, JiraIssue, JiraIssueFields, JiraIssueInput, UpdateIssueRequest};

impl JiraClient {
  /// Get a Jira issue by id or key
  ///
  /// `expand` names optional detail to include (e.g. `renderedFields`,
  /// `names`); it is sent only when non-empty.
  #[instrument(skip(self, expand), level = "debug")]
  pub async fn get_issue<S: AsRef<str>>(&self, id_or_key: &str, expand: &[S]) -> Result<JiraIssue> {
    require_issue_key(id_or_key, "Fetching an issue")?;

    let mut path = format!("/issue/{}", encode_segment(id_or_key));
    if !expand.is_empty() {
      let expand = expand.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
      let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("expand", &expand)
        .finish();
      path.push('?');
      path.push_str(&query);
    }

    self.get_json(&path, "issue").await
  }

  /// Create a Jira issue
  ///
  /// The returned issue carries the submitted fields, since the create
  /// response only identifies the new issue.
  #[instrument(skip(self, input), level = "debug")]
  pub async fn create_issue(&self, input: JiraIssueInput) -> Result<JiraIssue> {
    let body = encode_body(&CreateIssueRequest { fields: &input }, "issue creation request")?;

    let response = self.request(Method::POST, "/issue", Some(body)).await?;
    let mut issue: JiraIssue =
      serde_json::from_slice(&response).map_err(|source| JiraError::decode("created issue", source))?;
    issue.fields = JiraIssueFields::from(input);

    info!("Created issue {}", issue.key);
    Ok(issue)
  }

  /// Update the fields of a Jira issue
  #[instrument(skip(self, input), level = "debug")]
  pub async fn update_issue(&self, key: &str, input: &JiraIssueInput) -> Result<()> {
    require_issue_key(key, "Updating an issue")?;

    let body = encode_body(&UpdateIssueRequest { key, fields: input }, "issue update request")?;
    self
      .request(Method::PUT, &format!("/issue/{}", encode_segment(key)), Some(body))
      .await?;

    info!("Updated issue {}", key);
    Ok(())
  }
}
