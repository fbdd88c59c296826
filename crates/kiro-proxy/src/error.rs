use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a supplied or discovered credentials file cannot be used.
#[derive(Debug, Error)]
pub enum CredentialSourceError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Error reading file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON file: {}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid credentials file: missing accessToken or refreshToken")]
    MissingAuthFields(PathBuf),

    #[error("Kiro IDE credentials not found!")]
    IdeCredentialsNotFound,

    #[error("Please provide a credentials file or use --ide mode")]
    NoSource,

    #[error("kiro-cli support is not available yet.")]
    CliSourceUnavailable,
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Not configured! Run 'kiro-proxy install <credentials.json>' first.")]
    NotConfigured,

    #[error("Credentials file not found: {}", path.display())]
    CredentialsMissing { path: PathBuf },

    #[error(transparent)]
    InvalidCredentialSource(#[from] CredentialSourceError),

    #[error("Failed to save configuration to {}: {source}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start server: {0}")]
    Handoff(String),

    #[error("Input aborted: {0}")]
    Prompt(#[source] io::Error),

    #[error("Could not determine home directory (set KIRO_PROXY_HOME)")]
    NoHomeDirectory,
}

pub type Result<T> = std::result::Result<T, ProxyError>;
