//! # fixver core
//!
//! Configuration discovery shared by the Jira client and the command-line
//! front end: host URL normalization, `.netrc` credentials and the
//! `jira.toml` settings file.

pub mod config;
pub mod creds;
pub mod url;

pub use config::{ConfigDirs, JiraSettings, get_config_dirs};
pub use creds::Credentials;
