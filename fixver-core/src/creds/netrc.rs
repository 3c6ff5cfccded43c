//! Helpers for reading credentials stored in `.netrc` files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use url::Url;

use crate::creds::Credentials;

/// Returns the path to the `.netrc` file for the provided home directory.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use fixver_core::creds::netrc::get_netrc_path;
///
/// let home = Path::new("/home/user");
/// let path = get_netrc_path(home);
/// assert_eq!(path, Path::new("/home/user/.netrc"));
/// ```
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

/// Reads the content of a `.netrc` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_netrc_file(path: &Path) -> Result<String> {
  std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// One `machine` or `default` block.
struct NetrcEntry<'a> {
  /// `None` for the `default` block
  machine: Option<&'a str>,
  login: Option<&'a str>,
  password: Option<&'a str>,
}

impl NetrcEntry<'_> {
  fn credentials(&self) -> Option<Credentials> {
    Some(Credentials {
      username: self.login?.to_string(),
      password: self.password?.to_string(),
    })
  }
}

fn entries(content: &str) -> Vec<NetrcEntry<'_>> {
  let mut tokens = content.split_whitespace();
  let mut entries: Vec<NetrcEntry<'_>> = Vec::new();

  while let Some(token) = tokens.next() {
    match token {
      "machine" => entries.push(NetrcEntry {
        machine: tokens.next(),
        login: None,
        password: None,
      }),
      "default" => entries.push(NetrcEntry {
        machine: None,
        login: None,
        password: None,
      }),
      "login" => {
        let value = tokens.next();
        if let Some(entry) = entries.last_mut() {
          entry.login = value;
        }
      }
      "password" => {
        let value = tokens.next();
        if let Some(entry) = entries.last_mut() {
          entry.password = value;
        }
      }
      _ => {}
    }
  }

  entries
}

/// Finds credentials for `target_machine` in `.netrc` content.
///
/// Both the single-line (`machine host login user password pass`) and the
/// multi-line layouts are accepted. Entries missing a `login` or `password`
/// are skipped. The `default` block never matches a machine name; see
/// [`parse_netrc_default`].
pub fn parse_netrc(content: &str, target_machine: &str) -> Option<Credentials> {
  entries(content)
    .iter()
    .filter(|entry| entry.machine == Some(target_machine))
    .find_map(NetrcEntry::credentials)
}

/// Credentials of the `default` block, if present and complete.
pub fn parse_netrc_default(content: &str) -> Option<Credentials> {
  entries(content)
    .iter()
    .filter(|entry| entry.machine.is_none())
    .find_map(NetrcEntry::credentials)
}

fn parse_host(raw_host: &str) -> Option<Url> {
  let trimmed = raw_host.trim();
  let url = if trimmed.contains("://") {
    Url::parse(trimmed)
  } else {
    Url::parse(&format!("https://{trimmed}"))
  };
  url.ok().filter(|url| url.host_str().is_some())
}

/// Reduces a Jira host URL to the machine name used in `.netrc`, dropping
/// the scheme, port and any context path.
///
/// # Examples
///
/// ```
/// use fixver_core::creds::netrc::normalize_host;
///
/// assert_eq!(normalize_host("https://company.atlassian.net/"), "company.atlassian.net");
/// assert_eq!(normalize_host("http://jira.example.com:8080/jira"), "jira.example.com");
/// assert_eq!(normalize_host("my-jira-instance.com"), "my-jira-instance.com");
/// ```
pub fn normalize_host(raw_host: &str) -> String {
  match parse_host(raw_host).as_ref().and_then(Url::host_str) {
    Some(host) => host.to_string(),
    None => raw_host
      .trim()
      .trim_start_matches("https://")
      .trim_start_matches("http://")
      .trim_end_matches('/')
      .to_string(),
  }
}

/// Machine names to look up for a Jira host, most specific first.
///
/// A host with an explicit non-default port yields `host:port` before the
/// bare host name.
///
/// ```
/// use fixver_core::creds::netrc::netrc_machines;
///
/// assert_eq!(netrc_machines("https://jira.example.com:8443/jira"), ["jira.example.com:8443", "jira.example.com"]);
/// assert_eq!(netrc_machines("example.com/jira"), ["example.com"]);
/// ```
pub fn netrc_machines(raw_host: &str) -> Vec<String> {
  let host = normalize_host(raw_host);
  match parse_host(raw_host).and_then(|url| url.port()) {
    Some(port) => vec![format!("{host}:{port}"), host],
    None => vec![host],
  }
}

#[cfg(test)]
mod tests {
  use fixver_test_utils::NetrcGuard;

  use super::*;

  #[test]
  fn test_read_netrc_file_basic() {
    let guard = NetrcGuard::new(
      r#"machine example.com
  login testuser
  password testpass
"#,
    );

    let content = read_netrc_file(guard.netrc_path()).unwrap();
    let creds = parse_netrc(&content, "example.com").unwrap();
    assert_eq!(creds.username, "testuser");
    assert_eq!(creds.password, "testpass");
  }

  #[test]
  fn test_parse_netrc_multiple_machines() {
    let content = r#"machine example.com
  login user1
  password pass1

machine jira.example.com
  login user2
  password pass2

machine atlassian.net
  login user3
  password pass3
"#;

    let creds = parse_netrc(content, "example.com").unwrap();
    assert_eq!(creds.username, "user1");
    assert_eq!(creds.password, "pass1");

    let creds = parse_netrc(content, "jira.example.com").unwrap();
    assert_eq!(creds.username, "user2");
    assert_eq!(creds.password, "pass2");

    let creds = parse_netrc(content, "atlassian.net").unwrap();
    assert_eq!(creds.username, "user3");
    assert_eq!(creds.password, "pass3");
  }

  #[test]
  fn test_parse_netrc_machine_not_found() {
    let content = "machine example.com login testuser password testpass\n";
    assert!(parse_netrc(content, "nonexistent.com").is_none());
  }

  #[test]
  fn test_parse_netrc_incomplete_entry() {
    let content = r#"machine example.com
  login testuser
machine jira.example.com
  password pass2
"#;

    // Neither entry has both a login and a password
    assert!(parse_netrc(content, "example.com").is_none());
    assert!(parse_netrc(content, "jira.example.com").is_none());
  }

  #[test]
  fn test_parse_netrc_mixed_format() {
    let content = r#"machine example.com login user1 password pass1
machine jira.example.com
  login user2
  password pass2
machine atlassian.net login user3
  password pass3
"#;

    assert_eq!(parse_netrc(content, "example.com").unwrap().username, "user1");
    assert_eq!(parse_netrc(content, "jira.example.com").unwrap().password, "pass2");
    assert_eq!(parse_netrc(content, "atlassian.net").unwrap().password, "pass3");
  }

  #[test]
  fn test_parse_netrc_default_entry() {
    let content = r#"machine example.com login user1 password pass1
default login anon password anonpass
"#;

    assert_eq!(parse_netrc(content, "example.com").unwrap().username, "user1");
    assert!(parse_netrc(content, "default").is_none());

    let creds = parse_netrc_default(content).unwrap();
    assert_eq!(creds.username, "anon");
    assert_eq!(creds.password, "anonpass");
  }

  #[test]
  fn test_parse_netrc_without_default_entry() {
    let content = "machine example.com login user1 password pass1\n";
    assert!(parse_netrc_default(content).is_none());
    assert!(parse_netrc_default("default login anon\n").is_none());
  }

  #[test]
  fn test_parse_netrc_empty_file() {
    let guard = NetrcGuard::new("");
    let content = read_netrc_file(guard.netrc_path()).unwrap();
    assert!(parse_netrc(&content, "example.com").is_none());
  }

  #[test]
  fn test_read_netrc_file_missing() {
    let guard = NetrcGuard::new("");
    let missing = guard.home_dir().join("does-not-exist");

    assert!(read_netrc_file(&missing).is_err());
  }

  #[test]
  fn test_normalize_host() {
    assert_eq!(normalize_host("https://company.atlassian.net/"), "company.atlassian.net");
    assert_eq!(normalize_host("http://localhost:8080"), "localhost");
    assert_eq!(normalize_host("jira.example.com"), "jira.example.com");
    assert_eq!(normalize_host("https://example.com/jira"), "example.com");
    assert_eq!(normalize_host("HTTPS://Jira.Example.com"), "jira.example.com");
  }

  #[test]
  fn test_netrc_machines_with_context_path() {
    assert_eq!(netrc_machines("https://example.com/jira"), ["example.com"]);
    assert_eq!(netrc_machines("example.com/jira/"), ["example.com"]);
  }

  #[test]
  fn test_netrc_machines_with_port() {
    assert_eq!(
      netrc_machines("https://jira.example.com:8443"),
      ["jira.example.com:8443", "jira.example.com"]
    );
    assert_eq!(netrc_machines("http://127.0.0.1:9000/"), ["127.0.0.1:9000", "127.0.0.1"]);
  }

  #[test]
  fn test_netrc_machines_default_port_is_dropped() {
    assert_eq!(netrc_machines("https://jira.example.com:443"), ["jira.example.com"]);
  }
}
