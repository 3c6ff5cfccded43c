//! URL parsing helpers shared across crates.
//!
//! Hosts come from configuration files, environment variables and command-line
//! flags in many shapes; these helpers turn them into one canonical form.

use anyhow::Result;
use url::{Position, Url};

/// Environment variable storing the Jira host configuration.
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";

/// Environment variable storing the Jira project key.
pub const ENV_JIRA_PROJECT: &str = "JIRA_PROJECT";

/// Normalize a URL by removing trailing slashes from the path when it's just
/// "/".
fn normalize_url(url: &Url) -> String {
  let mut result = String::new();
  result.push_str(&url[..Position::BeforePath]);

  let path = url.path();
  if path != "/" {
    result.push_str(path);
  }

  if let Some(query) = url.query() {
    result.push('?');
    result.push_str(query);
  }

  if let Some(fragment) = url.fragment() {
    result.push('#');
    result.push_str(fragment);
  }

  result
}

/// Parse a URL by prefixing it with https:// scheme.
fn parse_with_https_prefix(input: &str) -> Result<Url> {
  let with_scheme = format!("https://{input}");
  Url::parse(&with_scheme).map_err(|_| anyhow::anyhow!("Failed to parse URL: '{input}'. Ensure it has a valid scheme."))
}

/// Ensure a URL has a proper scheme (http:// or https://).
///
/// If the input doesn't include a scheme, assumes https://. Also handles
/// malformed schemes like "http:/example.com" (missing slash).
pub fn ensure_url_scheme(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(anyhow::anyhow!("Host cannot be empty"));
  }

  let lowered = trimmed.to_ascii_lowercase();
  for scheme in ["http:", "https:"] {
    if lowered.starts_with(scheme) && !lowered.starts_with(&format!("{scheme}//")) {
      let remainder = trimmed[scheme.len()..].trim_start_matches('/');
      return Url::parse(&format!("{scheme}//{remainder}"))
        .map(|url| normalize_url(&url))
        .map_err(|_| anyhow::anyhow!("Failed to parse URL: '{trimmed}'. Ensure it has a valid scheme."));
    }
  }

  let url = match Url::parse(trimmed) {
    // "localhost:8080" parses as scheme "localhost" with no host
    Ok(url) if url.scheme().len() > 1 && url.host().is_some() => url,
    _ => parse_with_https_prefix(trimmed)?,
  };

  Ok(normalize_url(&url))
}
