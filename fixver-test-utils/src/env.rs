//! Environment variable management for testing
//!
//! Tests that read configuration from disk point `XDG_CONFIG_HOME` at a
//! temporary directory. Callers must serialize such tests (`#[serial]`)
//! since the process environment is shared.

use std::env;
use std::path::PathBuf;

use tempfile::TempDir;

/// Overrides `XDG_CONFIG_HOME` for the lifetime of the guard
pub struct EnvTestGuard {
  pub temp_dir: TempDir,
  original_config_home: Option<String>,
}

impl Default for EnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl EnvTestGuard {
  pub const XDG_CONFIG_HOME: &'static str = "XDG_CONFIG_HOME";

  /// Create a new guard with an empty config directory
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let original_config_home = env::var(Self::XDG_CONFIG_HOME).ok();

    let config_dir = temp_dir.path().join("config");
    std::fs::create_dir_all(&config_dir).expect("Failed to create config directory");

    // SAFETY: tests touching the environment run under `#[serial]`
    unsafe {
      env::set_var(Self::XDG_CONFIG_HOME, &config_dir);
    }

    Self {
      temp_dir,
      original_config_home,
    }
  }

  /// Path that `XDG_CONFIG_HOME` points at
  pub fn config_dir(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }
}

impl Drop for EnvTestGuard {
  fn drop(&mut self) {
    // SAFETY: same serialization as in `new`
    unsafe {
      match &self.original_config_home {
        Some(val) => env::set_var(Self::XDG_CONFIG_HOME, val),
        None => env::remove_var(Self::XDG_CONFIG_HOME),
      }
    }
  }
}
