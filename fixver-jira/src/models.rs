use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::null_as_default;

/// Custom field values keyed by their opaque `customfield_<n>` identifier
pub type CustomFields = BTreeMap<String, String>;

/// Represents Jira authentication credentials
#[derive(Clone)]
pub struct JiraAuth {
  pub username: String,
  pub api_token: String,
}

impl fmt::Debug for JiraAuth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("JiraAuth")
      .field("username", &self.username)
      .field("api_token", &"<redacted>")
      .finish()
  }
}

/// Where and as whom a client talks to Jira.
///
/// Set once when the client is built and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct JiraEndpoint {
  /// REST API root, e.g. `https://jira.example.com/rest/api/2`
  pub base_url: String,
  pub auth: JiraAuth,
  /// Project key used to scope release and search queries
  pub project: String,
}

impl JiraEndpoint {
  pub fn new(base_url: &str, auth: JiraAuth, project: &str) -> Self {
    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      auth,
      project: project.to_string(),
    }
  }
}

/// Represents a Jira project version ("fix version")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraRelease {
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub id: String,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub name: String,
  #[serde(
    rename = "self",
    default,
    deserialize_with = "null_as_default",
    skip_serializing_if = "String::is_empty"
  )]
  pub self_url: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project_id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "is_false")]
  pub archived: bool,
  #[serde(default, skip_serializing_if = "is_false")]
  pub released: bool,
  #[serde(default, skip_serializing_if = "is_false")]
  pub overdue: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub release_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user_start_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user_release_date: Option<String>,
  /// Issue fields to request when searching this release, replacing
  /// [`crate::consts::DEFAULT_SEARCH_FIELDS`]
  #[serde(skip)]
  pub issue_fields: Option<Vec<String>>,
}

impl JiraRelease {
  /// A bare release reference carrying only a name
  pub fn named(name: &str) -> Self {
    Self {
      name: name.to_string(),
      ..Default::default()
    }
  }

  /// Replace the default search field list for this release
  pub fn with_issue_fields<I, S>(mut self, fields: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.issue_fields = Some(fields.into_iter().map(Into::into).collect());
    self
  }

  /// Scheduled start date, if present and well-formed
  pub fn start(&self) -> Option<NaiveDate> {
    self.start_date.as_deref().and_then(parse_date)
  }

  /// Scheduled release date, if present and well-formed
  pub fn release(&self) -> Option<NaiveDate> {
    self.release_date.as_deref().and_then(parse_date)
  }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

const fn is_false(value: &bool) -> bool {
  !*value
}

/// Represents a Jira project reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraProject {
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub id: String,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub key: String,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub name: String,
  #[serde(
    rename = "self",
    default,
    deserialize_with = "null_as_default",
    skip_serializing_if = "String::is_empty"
  )]
  pub self_url: String,
}

impl JiraProject {
  /// A project reference by key, as accepted on write
  pub fn with_key(key: &str) -> Self {
    Self {
      key: key.to_string(),
      ..Default::default()
    }
  }
}

/// Represents a Jira issue type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraIssueType {
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub id: String,
  #[serde(
    rename = "self",
    default,
    deserialize_with = "null_as_default",
    skip_serializing_if = "String::is_empty"
  )]
  pub self_url: String,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub name: String,
  #[serde(default, skip_serializing_if = "is_false")]
  pub subtask: bool,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub description: String,
}

impl JiraIssueType {
  /// An issue type reference by name, as accepted on write
  pub fn named(name: &str) -> Self {
    Self {
      name: name.to_string(),
      ..Default::default()
    }
  }
}

/// Represents a Jira issue status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraIssueStatus {
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub id: String,
  #[serde(
    rename = "self",
    default,
    deserialize_with = "null_as_default",
    skip_serializing_if = "String::is_empty"
  )]
  pub self_url: String,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub name: String,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub description: String,
}

/// Represents a Jira user as embedded in comments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
  #[serde(
    rename = "self",
    default,
    deserialize_with = "null_as_default",
    skip_serializing_if = "String::is_empty"
  )]
  pub self_url: String,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub name: String,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub key: String,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub display_name: String,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub email_address: String,
}

/// Represents a Jira issue comment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraComment {
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub id: String,
  #[serde(
    rename = "self",
    default,
    deserialize_with = "null_as_default",
    skip_serializing_if = "String::is_empty"
  )]
  pub self_url: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub author: Option<JiraUser>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub update_author: Option<JiraUser>,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub body: String,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub created: String,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub updated: String,
}

/// Represents one page of issue comments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraComments {
  #[serde(default)]
  pub start_at: u32,
  #[serde(default)]
  pub max_results: u32,
  #[serde(default)]
  pub total: u32,
  #[serde(default, deserialize_with = "null_as_default")]
  pub comments: Vec<JiraComment>,
}

/// Represents a Jira issue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraIssue {
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub id: String,
  #[serde(
    rename = "self",
    default,
    deserialize_with = "null_as_default",
    skip_serializing_if = "String::is_empty"
  )]
  pub self_url: String,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub key: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub fields: JiraIssueFields,
  /// Comma-separated expansions the server can apply to this issue
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
  pub expand: String,
  /// Display names of the fields, present when `names` was expanded
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "BTreeMap::is_empty")]
  pub names: BTreeMap<String, String>,
}

/// Represents Jira issue fields.
///
/// On the wire the fixed fields and the custom fields share one JSON object;
/// see [`crate::fields`] for the encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JiraIssueFields {
  pub project: Option<JiraProject>,
  pub summary: String,
  pub issue_type: Option<JiraIssueType>,
  pub fix_versions: Vec<JiraRelease>,
  pub status: Option<JiraIssueStatus>,
  pub created: String,
  pub description: String,
  pub comment: Option<JiraComments>,
  pub custom_fields: CustomFields,
}

/// The writable subset of issue fields sent when creating or updating an issue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JiraIssueInput {
  pub project: Option<JiraProject>,
  pub summary: String,
  pub issue_type: Option<JiraIssueType>,
  pub fix_versions: Vec<JiraRelease>,
  pub description: String,
  pub custom_fields: CustomFields,
}

impl From<JiraIssueInput> for JiraIssueFields {
  fn from(input: JiraIssueInput) -> Self {
    Self {
      project: input.project,
      summary: input.summary,
      issue_type: input.issue_type,
      fix_versions: input.fix_versions,
      description: input.description,
      custom_fields: input.custom_fields,
      ..Default::default()
    }
  }
}

/// Represents an issue creation payload
#[derive(Debug, Serialize)]
pub struct CreateIssueRequest<'a> {
  pub fields: &'a JiraIssueInput,
}

/// Represents an issue update payload
#[derive(Debug, Serialize)]
pub struct UpdateIssueRequest<'a> {
  pub key: &'a str,
  pub fields: &'a JiraIssueInput,
}

/// Represents a search response envelope
#[derive(Debug, Deserialize)]
pub struct JiraSearchResults {
  #[serde(default, deserialize_with = "null_as_default")]
  pub issues: Vec<JiraIssue>,
}

/// Represents a Jira transition
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JiraTransition {
  pub id: String,
  pub name: String,
}

/// Represents a list of Jira transitions
#[derive(Debug, Deserialize)]
pub struct JiraTransitions {
  pub transitions: Vec<JiraTransition>,
}

/// Represents a transition request payload
#[derive(Debug, Serialize)]
pub struct TransitionRequest {
  pub transition: TransitionId,
}

/// Represents a transition ID for the request
#[derive(Debug, Serialize)]
pub struct TransitionId {
  pub id: String,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_jira_auth_debug_redacts_token() {
    let auth = JiraAuth {
      username: "test_user".to_string(),
      api_token: "test_token".to_string(),
    };

    let debug = format!("{auth:?}");
    assert!(debug.contains("test_user"));
    assert!(!debug.contains("test_token"));
  }

  #[test]
  fn test_endpoint_trims_trailing_slash() {
    let auth = JiraAuth {
      username: "test_user".to_string(),
      api_token: "test_token".to_string(),
    };
    let endpoint = JiraEndpoint::new("https://jira.example.com/rest/api/2/", auth, "ABC");

    assert_eq!(endpoint.base_url, "https://jira.example.com/rest/api/2");
    assert_eq!(endpoint.project, "ABC");
  }

  #[test]
  fn test_release_deserialization() {
    let json = json!({
        "self": "https://jira.example.com/rest/api/2/version/10100",
        "id": "10100",
        "name": "1.2.0",
        "archived": false,
        "released": true,
        "overdue": false,
        "startDate": "2024-01-02",
        "releaseDate": "2024-02-15",
        "userStartDate": "02/Jan/24",
        "userReleaseDate": "15/Feb/24",
        "projectId": 10000
    });

    let release: JiraRelease = serde_json::from_value(json).unwrap();

    assert_eq!(release.id, "10100");
    assert_eq!(release.name, "1.2.0");
    assert!(release.released);
    assert!(!release.archived);
    assert_eq!(release.project_id, Some(10000));
    assert_eq!(release.user_release_date.as_deref(), Some("15/Feb/24"));
    assert_eq!(release.start(), NaiveDate::from_ymd_opt(2024, 1, 2));
    assert_eq!(release.release(), NaiveDate::from_ymd_opt(2024, 2, 15));
    assert!(release.issue_fields.is_none());
  }

  #[test]
  fn test_release_with_malformed_date() {
    let release = JiraRelease {
      release_date: Some("15/Feb/24".to_string()),
      ..JiraRelease::named("1.2.0")
    };

    assert_eq!(release.release(), None);
    assert_eq!(release.start(), None);
  }

  #[test]
  fn test_release_reference_serialization() {
    let json = serde_json::to_value(JiraRelease::named("1.2.0")).unwrap();
    assert_eq!(json, json!({ "name": "1.2.0" }));
  }

  #[test]
  fn test_release_issue_fields_override() {
    let release = JiraRelease::named("1.2.0").with_issue_fields(["key", "summary"]);
    assert_eq!(
      release.issue_fields,
      Some(vec!["key".to_string(), "summary".to_string()])
    );
  }

  #[test]
  fn test_issue_deserialization() {
    let json = json!({
        "id": "10000",
        "self": "https://jira.example.com/rest/api/2/issue/10000",
        "key": "ABC-123",
        "expand": "renderedFields,names",
        "names": {
            "summary": "Summary",
            "customfield_10010": "Team"
        },
        "fields": {
            "summary": "Test issue",
            "description": null,
            "created": "2024-01-02T10:00:00.000+0000",
            "issuetype": {
                "id": "1",
                "name": "Bug",
                "subtask": false
            },
            "status": {
                "id": "10001",
                "name": "In Progress"
            },
            "fixVersions": [
                { "id": "10100", "name": "1.2.0" }
            ],
            "comment": {
                "startAt": 0,
                "maxResults": 50,
                "total": 1,
                "comments": [
                    {
                        "id": "20000",
                        "author": { "name": "jdoe", "displayName": "J. Doe" },
                        "updateAuthor": { "name": "jdoe" },
                        "body": "Looks good",
                        "created": "2024-01-03T10:00:00.000+0000",
                        "updated": "2024-01-03T11:00:00.000+0000"
                    }
                ]
            }
        }
    });

    let issue: JiraIssue = serde_json::from_value(json).unwrap();

    assert_eq!(issue.id, "10000");
    assert_eq!(issue.key, "ABC-123");
    assert_eq!(issue.expand, "renderedFields,names");
    assert_eq!(issue.names.get("customfield_10010").map(String::as_str), Some("Team"));
    assert_eq!(issue.fields.summary, "Test issue");
    assert_eq!(issue.fields.description, "");
    assert_eq!(issue.fields.issue_type.as_ref().unwrap().name, "Bug");
    assert_eq!(issue.fields.status.as_ref().unwrap().name, "In Progress");
    assert_eq!(issue.fields.fix_versions[0].name, "1.2.0");

    let comments = issue.fields.comment.unwrap();
    assert_eq!(comments.total, 1);
    assert_eq!(comments.comments[0].body, "Looks good");
    assert_eq!(comments.comments[0].author.as_ref().unwrap().display_name, "J. Doe");
    assert_eq!(comments.comments[0].update_author.as_ref().unwrap().name, "jdoe");
  }

  #[test]
  fn test_issue_without_fields() {
    let json = json!({
        "id": "10002",
        "key": "ABC-125",
        "self": "https://jira.example.com/rest/api/2/issue/10002"
    });

    let issue: JiraIssue = serde_json::from_value(json).unwrap();

    assert_eq!(issue.key, "ABC-125");
    assert_eq!(issue.fields, JiraIssueFields::default());
    assert!(issue.names.is_empty());
  }

  #[test]
  fn test_input_echoes_into_fields() {
    let mut custom_fields = CustomFields::new();
    custom_fields.insert("customfield_10010".to_string(), "Platform".to_string());
    let input = JiraIssueInput {
      project: Some(JiraProject::with_key("ABC")),
      summary: "New issue".to_string(),
      issue_type: Some(JiraIssueType::named("Task")),
      fix_versions: vec![JiraRelease::named("1.2.0")],
      description: "Details".to_string(),
      custom_fields,
    };

    let fields = JiraIssueFields::from(input);

    assert_eq!(fields.summary, "New issue");
    assert_eq!(fields.project.unwrap().key, "ABC");
    assert_eq!(fields.issue_type.unwrap().name, "Task");
    assert_eq!(fields.fix_versions.len(), 1);
    assert_eq!(fields.description, "Details");
    assert_eq!(fields.custom_fields.get("customfield_10010").map(String::as_str), Some("Platform"));
    assert!(fields.status.is_none());
    assert!(fields.comment.is_none());
  }

  #[test]
  fn test_jira_transitions_deserialization() {
    let json = json!({
        "transitions": [
            { "id": "11", "name": "To Do" },
            { "id": "21", "name": "In Progress" },
            { "id": "31", "name": "Done" }
        ]
    });

    let transitions: JiraTransitions = serde_json::from_value(json).unwrap();

    assert_eq!(transitions.transitions.len(), 3);
    assert_eq!(transitions.transitions[0].id, "11");
    assert_eq!(transitions.transitions[2].name, "Done");
  }

  #[test]
  fn test_jira_transition_request_serialization() {
    let request = TransitionRequest {
      transition: TransitionId { id: "21".to_string() },
    };

    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json, json!({ "transition": { "id": "21" } }));
  }
}
