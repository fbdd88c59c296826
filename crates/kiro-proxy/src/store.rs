//! Persisted gateway configuration (`~/.kiro-proxy/config.json`).

use crate::error::{ProxyError, Result};
use crate::paths::ProxyPaths;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 8000;

/// Local gateway settings. Every field is optional so that a partially
/// written file still loads.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_port"
    )]
    pub port: Option<u16>,
}

impl GatewayConfig {
    pub fn new(credentials_file: PathBuf, api_key: String, port: u16) -> Self {
        Self {
            credentials_file: Some(credentials_file),
            api_key: Some(api_key),
            port: Some(port),
        }
    }

    /// The credentials reference, treating an empty string as unset.
    pub fn credentials_path(&self) -> Option<&Path> {
        self.credentials_file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

/// A stored port that is not a valid TCP port is dropped (falling back to
/// the default) instead of invalidating the whole file.
fn lenient_port<'de, D>(deserializer: D) -> std::result::Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let port = value
            .as_u64()
            .and_then(|n| u16::try_from(n).ok())
            .filter(|port| *port != 0);
        if port.is_none() {
            warn!(field = "port", %value, "ignoring invalid port in config");
        }
        port
    }))
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("credentials_file", &self.credentials_file)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("port", &self.port)
            .finish()
    }
}

fn decode(document: Map<String, Value>) -> LoadOutcome {
    match serde_json::from_value(Value::Object(document)) {
        Ok(config) => LoadOutcome::Loaded(config),
        Err(err) => LoadOutcome::Malformed(err.to_string()),
    }
}

/// Result of reading the config file, keeping "absent" and "corrupt" apart.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(GatewayConfig),
    NotFound,
    Malformed(String),
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_paths(paths: &ProxyPaths) -> Self {
        Self::new(paths.config_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> LoadOutcome {
        match self.read_document() {
            Ok(document) => decode(document),
            Err(outcome) => outcome,
        }
    }

    /// The stored configuration, or `None` when the file is missing,
    /// unusable, or an empty object. `None` means "not configured"; a file
    /// holding any key counts as configured even if no field is usable.
    pub fn load_entry(&self) -> Option<GatewayConfig> {
        let outcome = match self.read_document() {
            Ok(document) if document.is_empty() => return None,
            Ok(document) => decode(document),
            Err(outcome) => outcome,
        };

        match outcome {
            LoadOutcome::Loaded(config) => Some(config),
            LoadOutcome::NotFound => None,
            LoadOutcome::Malformed(reason) => {
                warn!(path = %self.path.display(), %reason, "ignoring unreadable config");
                None
            }
        }
    }

    /// Load the configuration, falling back to the empty config when the
    /// file is missing or unusable.
    pub fn load(&self) -> GatewayConfig {
        self.load_entry().unwrap_or_default()
    }

    fn read_document(&self) -> std::result::Result<Map<String, Value>, LoadOutcome> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(LoadOutcome::NotFound),
            Err(err) => return Err(LoadOutcome::Malformed(err.to_string())),
        };

        serde_json::from_str(&content).map_err(|err| LoadOutcome::Malformed(err.to_string()))
    }

    /// Replace the stored configuration. The config directory is created
    /// on demand and the file is only readable by its owner.
    pub fn save(&self, config: &GatewayConfig) -> Result<()> {
        let content = serde_json::to_string_pretty(config).map_err(|err| {
            ProxyError::ConfigWrite {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidData, err),
            }
        })?;

        kiro_core::write_atomic_private(&self.path, content.as_bytes()).map_err(|source| {
            ProxyError::ConfigWrite {
                path: self.path.clone(),
                source,
            }
        })?;

        info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }
}
