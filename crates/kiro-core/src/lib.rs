//! Shared plumbing for kiro-proxy: well-known directory names, home
//! resolution and crash-safe file writes.

pub mod atomic_write;
pub mod home;

pub use atomic_write::{write_atomic, write_atomic_private};
pub use home::{resolve_home, HOME_OVERRIDE_ENV};

/// Per-user directory (under the home root) holding kiro-proxy state.
pub const KIRO_PROXY_DIR: &str = ".kiro-proxy";

/// File name of the persisted gateway configuration.
pub const CONFIG_FILE_NAME: &str = "config.json";
