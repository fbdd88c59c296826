//! Credentials file checks.
//!
//! Two strengths of check exist: a cheap substring scan used while probing
//! candidates, and a full JSON parse required before anything is persisted.

use crate::error::CredentialSourceError;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Keys that make a JSON document usable as Kiro credentials.
pub const AUTH_FIELDS: [&str; 2] = ["accessToken", "refreshToken"];

/// Textual marker check. Tolerates files that are present but malformed.
pub fn has_auth_marker(content: &str) -> bool {
    AUTH_FIELDS.iter().any(|field| content.contains(field))
}

/// Full structural check: the file must parse as a JSON object carrying at
/// least one of [`AUTH_FIELDS`] as a key.
pub fn validate_credentials_file(path: &Path) -> Result<(), CredentialSourceError> {
    let bytes = fs::read(path).map_err(|source| read_error(path, source))?;

    let document: Value =
        serde_json::from_slice(&bytes).map_err(|source| CredentialSourceError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;

    let has_field = document
        .as_object()
        .is_some_and(|obj| AUTH_FIELDS.iter().any(|field| obj.contains_key(*field)));

    if has_field {
        Ok(())
    } else {
        Err(CredentialSourceError::MissingAuthFields(path.to_path_buf()))
    }
}

/// Resolve an operator-supplied path to an absolute, symlink-free path.
pub fn resolve_explicit(path: &Path) -> Result<PathBuf, CredentialSourceError> {
    fs::canonicalize(path).map_err(|source| read_error(path, source))
}

fn read_error(path: &Path, source: io::Error) -> CredentialSourceError {
    if source.kind() == io::ErrorKind::NotFound {
        CredentialSourceError::NotFound(path.to_path_buf())
    } else {
        CredentialSourceError::Unreadable {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_marker_accepts_either_field() {
        assert!(has_auth_marker(r#"{"accessToken":"abc"}"#));
        assert!(has_auth_marker(r#"{"refreshToken":"abc"}"#));
        assert!(has_auth_marker("accessToken garbage, not json"));
        assert!(!has_auth_marker(r#"{"foo":"bar"}"#));
        assert!(!has_auth_marker(""));
    }

    #[test]
    fn test_validate_accepts_access_or_refresh_token() {
        let dir = tempdir().unwrap();
        let access = dir.path().join("access.json");
        let refresh = dir.path().join("refresh.json");
        fs::write(&access, r#"{"accessToken":"abc"}"#).unwrap();
        fs::write(&refresh, r#"{"refreshToken":"abc","region":"us-east-1"}"#).unwrap();

        assert!(validate_credentials_file(&access).is_ok());
        assert!(validate_credentials_file(&refresh).is_ok());
    }

    #[test]
    fn test_validate_distinguishes_failures() {
        let dir = tempdir().unwrap();
        let garbage = dir.path().join("garbage.json");
        let foreign = dir.path().join("foreign.json");
        let nested = dir.path().join("nested.json");
        fs::write(&garbage, "accessToken: not json").unwrap();
        fs::write(&foreign, r#"{"foo":"bar"}"#).unwrap();
        fs::write(&nested, r#"{"token":{"accessToken":"abc"}}"#).unwrap();

        assert!(matches!(
            validate_credentials_file(&garbage),
            Err(CredentialSourceError::InvalidJson { .. })
        ));
        assert!(matches!(
            validate_credentials_file(&foreign),
            Err(CredentialSourceError::MissingAuthFields(_))
        ));
        assert!(matches!(
            validate_credentials_file(&nested),
            Err(CredentialSourceError::MissingAuthFields(_))
        ));
        assert!(matches!(
            validate_credentials_file(&dir.path().join("absent.json")),
            Err(CredentialSourceError::NotFound(_))
        ));
    }

    #[test]
    fn test_non_object_json_lacks_auth_fields() {
        let dir = tempdir().unwrap();
        let list = dir.path().join("list.json");
        fs::write(&list, r#"["accessToken"]"#).unwrap();

        assert!(matches!(
            validate_credentials_file(&list),
            Err(CredentialSourceError::MissingAuthFields(_))
        ));
    }

    #[test]
    fn test_resolve_explicit_is_absolute() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("creds.json");
        fs::write(&file, "{}").unwrap();

        let resolved = resolve_explicit(&file).unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved, fs::canonicalize(&file).unwrap());

        assert!(matches!(
            resolve_explicit(&dir.path().join("missing.json")),
            Err(CredentialSourceError::NotFound(_))
        ));
    }
}
