//! # Jira Project Version Endpoints
//!
//! Lists the release versions ("fix versions") of the configured project.

use tracing::{info, instrument};

use super::encode_segment;
use crate::client::JiraClient;
use crate::error::Result;
use crate::models::JiraRelease;

impl JiraClient {
  /// Get all versions of the configured project
  ///
  /// The endpoint returns every version in one array; no paging is applied.
  #[instrument(skip(self), level = "debug")]
  pub async fn get_releases(&self) -> Result<Vec<JiraRelease>> {
    let path = format!("/project/{}/versions", encode_segment(self.project()));

    let releases: Vec<JiraRelease> = self.get_json(&path, "project versions").await?;
    info!("Found {} versions for project {}", releases.len(), self.project());

    Ok(releases)
  }
}

#[cfg(test)]
mod tests {
  use wiremock::matchers::{basic_auth, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::client::create_jira_client;
  use crate::error::JiraError;

  #[tokio::test]
  async fn test_get_releases() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/rest/api/2", mock_server.uri());
    let client = create_jira_client(&base_url, "test_user", "test_token", "ABC");

    Mock::given(method("GET"))
      .and(path("/rest/api/2/project/ABC/versions"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
          {
              "id": "10100",
              "name": "1.1.0",
              "archived": true,
              "released": true,
              "releaseDate": "2023-11-30",
              "projectId": 10000
          },
          {
              "id": "10101",
              "name": "1.2.0",
              "archived": false,
              "released": false,
              "overdue": true,
              "startDate": "2024-01-02",
              "releaseDate": "2024-02-15",
              "projectId": 10000
          }
      ])))
      .expect(1)
      .mount(&mock_server)
      .await;

    let releases = client.get_releases().await?;

    assert_eq!(releases.len(), 2);
    assert_eq!(releases[0].name, "1.1.0");
    assert!(releases[0].archived);
    assert_eq!(releases[1].id, "10101");
    assert!(releases[1].overdue);
    assert_eq!(releases[1].start_date.as_deref(), Some("2024-01-02"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_releases_empty() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/rest/api/2", mock_server.uri());
    let client = create_jira_client(&base_url, "test_user", "test_token", "ABC");

    Mock::given(method("GET"))
      .and(path("/rest/api/2/project/ABC/versions"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
      .mount(&mock_server)
      .await;

    assert!(client.get_releases().await?.is_empty());

    Ok(())
  }

  #[tokio::test]
  async fn test_get_releases_malformed_body() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/rest/api/2", mock_server.uri());
    let client = create_jira_client(&base_url, "test_user", "test_token", "ABC");

    Mock::given(method("GET"))
      .and(path("/rest/api/2/project/ABC/versions"))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
      .mount(&mock_server)
      .await;

    let error = client.get_releases().await.unwrap_err();
    assert!(matches!(error, JiraError::Decode { .. }));
  }

  #[tokio::test]
  async fn test_get_releases_unknown_project() {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/rest/api/2", mock_server.uri());
    let client = create_jira_client(&base_url, "test_user", "test_token", "ABC");

    Mock::given(method("GET"))
      .and(path("/rest/api/2/project/ABC/versions"))
      .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
          "errorMessages": ["No project could be found with key 'ABC'."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let error = client.get_releases().await.unwrap_err();
    assert!(matches!(error, JiraError::NotFound(_)));
    assert!(error.to_string().contains("No project could be found"));
  }
}
