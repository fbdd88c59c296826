//! Filesystem locations used by every flow.
//!
//! All paths hang off a single home root so tests (and `KIRO_PROXY_HOME`)
//! can relocate the whole layout.

use crate::error::{ProxyError, Result};
use kiro_core::{CONFIG_FILE_NAME, KIRO_PROXY_DIR};
use std::path::{Path, PathBuf};

/// File the Kiro IDE writes its auth token to.
pub const KIRO_TOKEN_FILE_NAME: &str = "kiro-auth-token.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyPaths {
    home: PathBuf,
}

impl ProxyPaths {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Root the layout at `KIRO_PROXY_HOME` or the user's home directory.
    pub fn from_env() -> Result<Self> {
        kiro_core::resolve_home()
            .map(Self::new)
            .ok_or(ProxyError::NoHomeDirectory)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn config_dir(&self) -> PathBuf {
        self.home.join(KIRO_PROXY_DIR)
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir().join(CONFIG_FILE_NAME)
    }

    /// AWS SSO cache directory the IDE refreshes tokens into.
    pub fn credential_cache_dir(&self) -> PathBuf {
        self.home.join(".aws").join("sso").join("cache")
    }

    pub fn canonical_credentials(&self) -> PathBuf {
        self.credential_cache_dir().join(KIRO_TOKEN_FILE_NAME)
    }

    /// Expand a leading `~` against the home root.
    pub fn expand_user(&self, input: &str) -> PathBuf {
        if input == "~" {
            return self.home.clone();
        }
        match input
            .strip_prefix("~/")
            .or_else(|| input.strip_prefix("~\\"))
        {
            Some(rest) => self.home.join(rest),
            None => PathBuf::from(input),
        }
    }
}
