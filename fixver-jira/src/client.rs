//! # Jira HTTP Client
//!
//! Owns the endpoint configuration and performs single authenticated round
//! trips against the Jira REST API, classifying each response by status.

use reqwest::{Client, Method, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace, warn};
use url::Url;

use crate::consts::USER_AGENT;
use crate::error::{JiraError, Result};
use crate::models::{JiraAuth, JiraEndpoint};

/// Represents a Jira API client
#[derive(Debug)]
pub struct JiraClient {
  pub(crate) client: Client,
  pub(crate) endpoint: JiraEndpoint,
}

impl JiraClient {
  /// Create a new Jira client
  pub fn new(endpoint: JiraEndpoint) -> Self {
    let client = Client::new();
    Self { client, endpoint }
  }

  /// The endpoint this client talks to
  pub const fn endpoint(&self) -> &JiraEndpoint {
    &self.endpoint
  }

  /// The project key scoping release and search queries
  pub fn project(&self) -> &str {
    &self.endpoint.project
  }

  /// Perform one authenticated request against a path relative to the REST
  /// API root and return the raw response body.
  ///
  /// The body is read in full before the status is classified so failures
  /// can carry it. No retries are attempted.
  #[instrument(skip(self, body), level = "debug")]
  pub async fn request(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Vec<u8>> {
    let url = Url::parse(&format!("{}{}", self.endpoint.base_url, path)).map_err(|source| {
      JiraError::InvalidEndpoint {
        base_url: self.endpoint.base_url.clone(),
        path: path.to_string(),
        source,
      }
    })?;
    let url_text = url.to_string();

    debug!("Start {} {}", method, url_text);

    let mut request = self
      .client
      .request(method.clone(), url)
      .header(header::CONTENT_TYPE, "application/json")
      .header(header::USER_AGENT, USER_AGENT)
      .basic_auth(&self.endpoint.auth.username, Some(&self.endpoint.auth.api_token));
    if let Some(body) = body {
      request = request.body(body);
    }

    let transport_failure = |source| JiraError::TransportFailure {
      method: method.clone(),
      url: url_text.clone(),
      source,
    };

    let response = request.send().await.map_err(transport_failure)?;
    let status = response.status();
    trace!("Response headers: {:?}", response.headers());

    let bytes = response.bytes().await.map_err(transport_failure)?;

    if let Some(error) = JiraError::from_status(&method, &url_text, status, &bytes) {
      warn!("{}", error);
      return Err(error);
    }

    debug!("Done {} {} with status {}", method, url_text, status);
    Ok(bytes.to_vec())
  }

  /// GET a path and decode the JSON response
  pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
    let body = self.request(Method::GET, path, None).await?;
    serde_json::from_slice(&body).map_err(|source| JiraError::decode(what, source))
  }

  /// Test the Jira connection by fetching the current user
  ///
  /// Rejected credentials yield `Ok(false)`; any other failure is returned.
  pub async fn test_connection(&self) -> Result<bool> {
    match self.request(Method::GET, "/myself", None).await {
      Ok(_) => Ok(true),
      Err(JiraError::Unauthorized(_)) => Ok(false),
      Err(error) => Err(error),
    }
  }
}

/// Serialize a request payload to a JSON body
pub(crate) fn encode_body<T: Serialize>(payload: &T, what: &str) -> Result<Vec<u8>> {
  serde_json::to_vec(payload).map_err(|source| JiraError::encode(what, source))
}

/// Create a Jira client from credentials
pub fn create_jira_client(base_url: &str, username: &str, api_token: &str, project: &str) -> JiraClient {
  let auth = JiraAuth {
    username: username.to_string(),
    api_token: api_token.to_string(),
  };

  JiraClient::new(JiraEndpoint::new(base_url, auth, project))
}
