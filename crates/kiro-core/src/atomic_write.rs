//! Crash-safe file replacement.
//!
//! Content goes to a sibling temp file which is synced and then renamed over
//! the target, so readers see either the old file or the new one.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Replace `path` with `content`, creating missing parent directories.
///
/// `mode` sets Unix permissions on the new file (0o644 when `None`) and is
/// ignored on other platforms.
pub fn write_atomic(path: &Path, content: &[u8], mode: Option<u32>) -> io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory")
    })?;
    fs::create_dir_all(parent)?;

    let staging = staging_path(path);
    if let Err(err) = write_synced(&staging, content, mode) {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }

    if let Err(err) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }

    #[cfg(unix)]
    {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    tracing::debug!(path = %path.display(), bytes = content.len(), "file replaced");
    Ok(())
}

/// [`write_atomic`] with owner-only permissions, for files holding secrets.
pub fn write_atomic_private(path: &Path, content: &[u8]) -> io::Result<()> {
    write_atomic(path, content, Some(0o600))
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

fn write_synced(path: &Path, content: &[u8], mode: Option<u32>) -> io::Result<()> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        opts.mode(mode.unwrap_or(0o644));
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = opts.open(path)?;
    file.write_all(content)?;
    file.sync_all()
}
