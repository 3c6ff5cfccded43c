use reqwest::Method;
use tracing::{info, instrument};

use super::{encode_segment, require_issue_key};
use crate::client::{JiraClient, encode_body};
use crate::error::Result;
use crate::models::{JiraTransition, JiraTransitions, TransitionId, TransitionRequest};

impl JiraClient {
  /// Get available transitions for an issue
  #[instrument(skip(self), level = "debug")]
  pub async fn get_transitions(&self, issue_key: &str) -> Result<Vec<JiraTransition>> {
    require_issue_key(issue_key, "Listing transitions")?;

    let path = format!("/issue/{}/transitions", encode_segment(issue_key));
    let transitions: JiraTransitions = self.get_json(&path, "issue transitions").await?;

    Ok(transitions.transitions)
  }

  /// Transition an issue to a new status
  #[instrument(skip(self), level = "debug")]
  pub async fn transition_issue(&self, issue_key: &str, transition_id: &str) -> Result<()> {
    require_issue_key(issue_key, "Transitioning an issue")?;

    let payload = TransitionRequest {
      transition: TransitionId {
        id: transition_id.to_string(),
      },
    };
    let body = encode_body(&payload, "transition request")?;

    self
      .request(
        Method::POST,
        &format!("/issue/{}/transitions", encode_segment(issue_key)),
        Some(body),
      )
      .await?;

    info!("Transitioned issue {} with transition {}", issue_key, transition_id);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use wiremock::matchers::{any, basic_auth, body_json, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::client::{JiraClient, create_jira_client};
  use crate::error::JiraError;

  fn test_client(mock_server: &MockServer) -> JiraClient {
    let base_url = format!("{}/rest/api/2", mock_server.uri());
    create_jira_client(&base_url, "test_user", "test_token", "ABC")
  }

  #[tokio::test]
  async fn test_get_transitions() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    // Mock response for transitions
    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/ABC-123/transitions"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
          "transitions": [
              { "id": "11", "name": "To Do" },
              { "id": "21", "name": "In Progress" },
              { "id": "31", "name": "Done" }
          ]
      })))
      .mount(&mock_server)
      .await;

    let transitions = client.get_transitions("ABC-123").await?;
    assert_eq!(transitions.len(), 3);
    assert_eq!(transitions[0].id, "11");
    assert_eq!(transitions[0].name, "To Do");
    assert_eq!(transitions[2].id, "31");
    assert_eq!(transitions[2].name, "Done");

    Ok(())
  }

  #[tokio::test]
  async fn test_transition_issue() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/ABC-123/transitions"))
      .and(basic_auth("test_user", "test_token"))
      .and(body_json(serde_json::json!({
          "transition": {
              "id": "21"
          }
      })))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    client.transition_issue("ABC-123", "21").await?;

    Ok(())
  }

  #[tokio::test]
  async fn test_transition_issue_invalid_transition() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/ABC-123/transitions"))
      .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
          "errorMessages": ["The requested transition is not available for the current status."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let error = client.transition_issue("ABC-123", "invalid").await.unwrap_err();
    assert_eq!(error.status(), Some(400));
    assert!(error.to_string().contains("not available"));

    Ok(())
  }

  #[tokio::test]
  async fn test_transitions_not_found() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/NONEXISTENT-123/transitions"))
      .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
          "errorMessages": ["Issue does not exist or you do not have permission to see it."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let result = client.get_transitions("NONEXISTENT-123").await;
    assert!(matches!(result, Err(JiraError::NotFound(_))));

    Ok(())
  }

  #[tokio::test]
  async fn test_transitions_empty_key_makes_no_request() {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    Mock::given(any())
      .respond_with(ResponseTemplate::new(200))
      .expect(0)
      .mount(&mock_server)
      .await;

    assert!(matches!(client.get_transitions("").await, Err(JiraError::Validation(_))));
    assert!(matches!(
      client.transition_issue("", "21").await,
      Err(JiraError::Validation(_))
    ));
  }

  #[tokio::test]
  async fn test_transitions_encode_issue_key() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/ABC%2F1/transitions"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "transitions": [] })))
      .expect(1)
      .mount(&mock_server)
      .await;

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/ABC%2F1/transitions"))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    assert!(client.get_transitions("ABC/1").await?.is_empty());
    client.transition_issue("ABC/1", "21").await?;

    Ok(())
  }
}
