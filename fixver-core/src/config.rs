//! # Configuration Management
//!
//! Locates the fixver configuration directory and reads the `jira.toml`
//! settings file. Settings are layered: the file first, then environment
//! variables, then explicit overrides such as command-line flags.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::url::{ENV_JIRA_HOST, ENV_JIRA_PROJECT, ensure_url_scheme};

/// Represents the configuration directories for fixver
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("", "", "fixver").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
    })
  }

  /// Get the config directory
  pub const fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  /// Get the path to the Jira settings file
  pub fn jira_config_path(&self) -> PathBuf {
    self.config_dir.join("jira.toml")
  }

  /// Load Jira settings from file, or empty settings when there is none
  pub fn load_jira_settings(&self) -> Result<JiraSettings> {
    let config_path = self.jira_config_path();

    if !config_path.exists() {
      debug!("No Jira settings at {}", config_path.display());
      return Ok(JiraSettings::default());
    }

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read Jira settings from {}", config_path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse Jira settings from {}", config_path.display()))
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}

/// Jira connection settings, every value optional until resolved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraSettings {
  /// Jira host, with or without scheme (e.g. `company.atlassian.net`)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub host: Option<String>,

  /// Project key scoping release queries
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project: Option<String>,

  /// Issue fields requested when searching a release
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub search_fields: Option<Vec<String>>,
}

impl JiraSettings {
  /// Read settings from the process environment
  pub fn from_env() -> Self {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  /// Read settings through a variable lookup function
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    Self {
      host: non_empty(ENV_JIRA_HOST),
      project: non_empty(ENV_JIRA_PROJECT),
      search_fields: None,
    }
  }

  /// Layer `other` on top of these settings; values present in `other` win
  pub fn merge(self, other: Self) -> Self {
    Self {
      host: other.host.or(self.host),
      project: other.project.or(self.project),
      search_fields: other.search_fields.or(self.search_fields),
    }
  }

  /// The Jira host with a URL scheme
  pub fn require_host(&self) -> Result<String> {
    let host = self.host.as_deref().with_context(|| {
      format!("Jira host not configured. Set '{ENV_JIRA_HOST}', pass --host, or add 'host' to jira.toml")
    })?;
    ensure_url_scheme(host)
  }

  /// The project key
  pub fn require_project(&self) -> Result<&str> {
    self.project.as_deref().with_context(|| {
      format!("Jira project not configured. Set '{ENV_JIRA_PROJECT}', pass --project, or add 'project' to jira.toml")
    })
  }
}
