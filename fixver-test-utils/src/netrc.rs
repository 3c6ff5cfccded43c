//! Temporary `.netrc` files for credential tests

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Owns a temporary home directory containing a `.netrc` file
///
/// The process environment is left alone; pass [`NetrcGuard::home_dir`] to
/// the code under test instead of relying on `HOME`.
pub struct NetrcGuard {
  temp_dir: TempDir,
  netrc_path: PathBuf,
}

impl NetrcGuard {
  /// Create a new guard whose `.netrc` holds `content`
  pub fn new(content: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let netrc_path = temp_dir.path().join(".netrc");
    fs::write(&netrc_path, content).expect("Failed to write test .netrc");

    Self { temp_dir, netrc_path }
  }

  /// Create a guard with a single `machine` entry
  pub fn with_machine(machine: &str, login: &str, password: &str) -> Self {
    Self::new(&format!("machine {machine}\n  login {login}\n  password {password}\n"))
  }

  /// Get the path to the .netrc file
  pub fn netrc_path(&self) -> &Path {
    &self.netrc_path
  }

  /// Get the temporary home directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }
}
