//! Terminal message helpers.

use owo_colors::OwoColorize;

/// Print a success message
pub fn print_success(message: &str) {
  println!("{} {}", "✓".green().bold(), message);
}

/// Print an informational message
pub fn print_info(message: &str) {
  println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  eprintln!("{} {}", "!".yellow().bold(), message);
}
