//! Non-interactive setup: pick a credentials source, validate it, settle on
//! an API key and persist the gateway configuration.

use crate::credentials::{resolve_explicit, validate_credentials_file};
use crate::error::{CredentialSourceError, Result};
use crate::locator::CredentialLocator;
use crate::paths::ProxyPaths;
use crate::store::{ConfigStore, GatewayConfig, DEFAULT_PORT};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use std::path::PathBuf;
use tracing::info;

/// Random bytes behind a generated API key.
pub const API_KEY_BYTES: usize = 16;

/// Generate a URL-safe bearer key for the local gateway.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; API_KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[derive(Debug, Clone, Default)]
pub struct InstallRequest {
    pub credentials_file: Option<PathBuf>,
    pub ide: bool,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub config: GatewayConfig,
    pub credentials_file: PathBuf,
    pub api_key: String,
    /// The key was generated here and must be shown to the operator.
    pub generated_key: bool,
    /// The credentials file came from IDE auto-detection.
    pub autodetected: bool,
}

pub struct InstallFlow {
    locator: CredentialLocator,
    store: ConfigStore,
}

impl InstallFlow {
    pub fn new(paths: &ProxyPaths) -> Self {
        Self::with_parts(CredentialLocator::from_paths(paths), ConfigStore::from_paths(paths))
    }

    pub fn with_parts(locator: CredentialLocator, store: ConfigStore) -> Self {
        Self { locator, store }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// IDE auto-detection takes precedence over an explicit path.
    pub fn resolve_source(&self, request: &InstallRequest) -> Result<PathBuf> {
        if request.ide {
            return Ok(self.detect_ide_credentials()?);
        }
        match &request.credentials_file {
            Some(path) => Ok(resolve_explicit(path)?),
            None => Err(CredentialSourceError::NoSource.into()),
        }
    }

    pub fn detect_ide_credentials(&self) -> std::result::Result<PathBuf, CredentialSourceError> {
        self.locator
            .locate()
            .ok_or(CredentialSourceError::IdeCredentialsNotFound)
    }

    /// Validate and persist. Nothing is written unless every check passes.
    pub fn install(&self, request: InstallRequest) -> Result<InstallOutcome> {
        let autodetected = request.ide;
        let credentials_file = self.resolve_source(&request)?;
        validate_credentials_file(&credentials_file)?;

        let (api_key, generated_key) = match request.api_key.filter(|key| !key.is_empty()) {
            Some(key) => (key, false),
            None => (generate_api_key(), true),
        };

        let config = GatewayConfig::new(credentials_file.clone(), api_key.clone(), DEFAULT_PORT);
        self.store.save(&config)?;
        info!(
            credentials = %credentials_file.display(),
            generated_key,
            "gateway installed"
        );

        Ok(InstallOutcome {
            config,
            credentials_file,
            api_key,
            generated_key,
            autodetected,
        })
    }
}
