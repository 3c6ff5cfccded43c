//! Constants for the fixver-jira client.

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!("fixver/", env!("CARGO_PKG_VERSION"));

/// Path of the REST API root relative to the Jira host
pub const REST_API_PATH: &str = "/rest/api/2";

/// Issue fields requested by a release search when the release carries no
/// override list
pub const DEFAULT_SEARCH_FIELDS: &[&str] = &[
  "id",
  "key",
  "self",
  "summary",
  "issuetype",
  "status",
  "description",
  "created",
  "comment",
];

/// Key prefix of server-assigned custom fields
pub const CUSTOM_FIELD_PREFIX: &str = "customfield_";
