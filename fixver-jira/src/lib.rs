//! # Jira REST Client
//!
//! Talks to the Jira REST API (v2) for one project: lists its releases
//! ("fix versions"), searches the issues assigned to a release, and fetches,
//! creates and updates single issues.
//!
//! Issue fields are exchanged as one flat JSON object in which well-known
//! fields sit next to server-assigned `customfield_<n>` entries. The
//! well-known fields map to [`JiraIssueFields`]; the custom ones are kept as
//! plain strings in [`CustomFields`].

pub mod auth;
mod client;
pub mod consts;
mod endpoints;
pub mod error;
mod fields;
pub mod models;

pub use auth::{create_jira_client_from_netrc, create_jira_runtime_and_client};
pub use client::{JiraClient, create_jira_client};
pub use endpoints::search::release_jql;
pub use error::{HttpFailure, JiraError, Result};
pub use models::{
  CustomFields, JiraAuth, JiraComment, JiraComments, JiraEndpoint, JiraIssue, JiraIssueFields, JiraIssueInput,
  JiraIssueStatus, JiraIssueType, JiraProject, JiraRelease, JiraTransition, JiraUser,
};
