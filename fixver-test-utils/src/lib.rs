//! Test utilities shared across the fixver workspace
//!
//! - XDG config directory isolation ([`EnvTestGuard`])
//! - Throwaway `.netrc` files ([`NetrcGuard`])
//!
//! The dead_code lint is disabled because the compiler cannot see usage
//! across crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod env;
pub mod netrc;

pub use env::EnvTestGuard;
pub use netrc::NetrcGuard;
