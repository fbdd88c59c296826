//! Kiro IDE credential discovery.
//!
//! The canonical token file is tried first. Failing that, every `*.json` in
//! the SSO cache directory is considered newest-first, since tools that
//! rotate tokens may write a fresh file under a new name.

use crate::credentials::has_auth_marker;
use crate::paths::ProxyPaths;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CredentialLocator {
    canonical: PathBuf,
    cache_dir: PathBuf,
}

impl CredentialLocator {
    pub fn new(canonical: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            canonical: canonical.into(),
            cache_dir: cache_dir.into(),
        }
    }

    pub fn from_paths(paths: &ProxyPaths) -> Self {
        Self::new(paths.canonical_credentials(), paths.credential_cache_dir())
    }

    /// Find a plausible credentials file. Read-only; unreadable candidates
    /// are skipped.
    pub fn locate(&self) -> Option<PathBuf> {
        if is_candidate(&self.canonical) {
            debug!(path = %self.canonical.display(), "canonical credentials accepted");
            return Some(self.canonical.clone());
        }

        self.cache_candidates()
            .into_iter()
            .find(|path| is_candidate(path))
    }

    /// JSON files in the cache directory, most recently modified first.
    fn cache_candidates(&self) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = %self.cache_dir.display(), error = %err, "cache dir not readable");
                return Vec::new();
            }
        };

        let mut files: Vec<(SystemTime, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| {
                let meta = fs::metadata(&path).ok()?;
                if !meta.is_file() {
                    return None;
                }
                Some((meta.modified().ok()?, path))
            })
            .collect();

        files.sort_by(|(a_time, a_path), (b_time, b_path)| {
            b_time.cmp(a_time).then_with(|| a_path.cmp(b_path))
        });
        files.into_iter().map(|(_, path)| path).collect()
    }
}

fn is_candidate(path: &Path) -> bool {
    match fs::read_to_string(path) {
        Ok(content) => has_auth_marker(&content),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "skipping candidate");
            false
        }
    }
}
