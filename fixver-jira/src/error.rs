//! # Jira Client Errors
//!
//! Typed failures surfaced by the transport, the field codec and the query
//! operations. HTTP failures keep the method, URL, status and response body so
//! callers can log and diagnose them without re-issuing the request.

use std::fmt;

use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Details of a response that was classified as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
  pub method: Method,
  pub url: String,
  pub status: u16,
  pub body: String,
}

impl fmt::Display for HttpFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {} returned HTTP {}", self.method, self.url, self.status)?;
    if !self.body.is_empty() {
      write!(f, ": {}", self.body)?;
    }
    Ok(())
  }
}

/// Errors returned by [`crate::JiraClient`] operations.
#[derive(Debug, Error)]
pub enum JiraError {
  /// The configured base URL and the request path do not form a valid URL.
  #[error("Failed to build URL from '{base_url}' and '{path}': {source}")]
  InvalidEndpoint {
    base_url: String,
    path: String,
    #[source]
    source: url::ParseError,
  },

  /// The request could not be sent or its body could not be read.
  #[error("{method} {url} failed: {source}")]
  TransportFailure {
    method: Method,
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("Authentication failed: {0}")]
  Unauthorized(HttpFailure),

  #[error("Not found: {0}")]
  NotFound(HttpFailure),

  #[error("Method not allowed: {0}")]
  MethodNotAllowed(HttpFailure),

  #[error("Unsupported media type: {0}")]
  UnsupportedMediaType(HttpFailure),

  #[error("Bad gateway: {0}")]
  BadGateway(HttpFailure),

  /// Any other status at or above 400.
  #[error("Request failed: {0}")]
  RequestFailed(HttpFailure),

  /// The response body is not valid JSON or does not match the expected shape.
  #[error("Failed to decode {what}: {source}")]
  Decode {
    what: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("Failed to encode {what}: {source}")]
  Encode {
    what: String,
    #[source]
    source: serde_json::Error,
  },

  /// Caller input rejected before any network call.
  #[error("Invalid input: {0}")]
  Validation(String),
}

/// Result type for Jira client operations.
pub type Result<T> = std::result::Result<T, JiraError>;

impl JiraError {
  /// Classify a completed response by its status code.
  ///
  /// Returns `None` for statuses below 400.
  pub fn from_status(method: &Method, url: &str, status: StatusCode, body: &[u8]) -> Option<Self> {
    if status.as_u16() < 400 {
      return None;
    }

    let failure = HttpFailure {
      method: method.clone(),
      url: url.to_string(),
      status: status.as_u16(),
      body: String::from_utf8_lossy(body).into_owned(),
    };

    Some(match status {
      StatusCode::UNAUTHORIZED => Self::Unauthorized(failure),
      StatusCode::NOT_FOUND => Self::NotFound(failure),
      StatusCode::METHOD_NOT_ALLOWED => Self::MethodNotAllowed(failure),
      StatusCode::UNSUPPORTED_MEDIA_TYPE => Self::UnsupportedMediaType(failure),
      StatusCode::BAD_GATEWAY => Self::BadGateway(failure),
      _ => Self::RequestFailed(failure),
    })
  }

  /// The HTTP failure details, when the error came from a response status.
  pub const fn http_failure(&self) -> Option<&HttpFailure> {
    match self {
      Self::Unauthorized(failure)
      | Self::NotFound(failure)
      | Self::MethodNotAllowed(failure)
      | Self::UnsupportedMediaType(failure)
      | Self::BadGateway(failure)
      | Self::RequestFailed(failure) => Some(failure),
      _ => None,
    }
  }

  /// The HTTP status code, when the error came from a response status.
  pub fn status(&self) -> Option<u16> {
    self.http_failure().map(|failure| failure.status)
  }

  pub(crate) fn decode(what: impl Into<String>, source: serde_json::Error) -> Self {
    Self::Decode {
      what: what.into(),
      source,
    }
  }

  pub(crate) fn encode(what: impl Into<String>, source: serde_json::Error) -> Self {
    Self::Encode {
      what: what.into(),
      source,
    }
  }
}
