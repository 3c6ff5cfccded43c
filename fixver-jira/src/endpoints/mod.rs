//! # Jira API Endpoints
//!
//! Endpoint implementations grouped by resource: project versions, issue
//! search, single issues and workflow transitions.

use crate::error::{JiraError, Result};

pub mod issues;
pub mod search;
pub mod transitions;
pub mod versions;

/// Reject an empty issue key before any request is made.
fn require_issue_key(key: &str, operation: &str) -> Result<()> {
  if key.trim().is_empty() {
    return Err(JiraError::Validation(format!("{operation} requires a non-empty issue key")));
  }
  Ok(())
}

/// Percent-encode one path segment, so a key containing `/`, `?` or `#`
/// cannot reach a different resource.
fn encode_segment(segment: &str) -> String {
  urlencoding::encode(segment).into_owned()
}
