//! Read-only view of the persisted configuration.

use crate::store::ConfigStore;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    NotConfigured { config_file: PathBuf },
    Configured(ConfiguredStatus),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredStatus {
    pub credentials_file: Option<PathBuf>,
    /// Checked at report time; the file may have moved since install.
    pub credentials_exist: bool,
    pub api_key: Option<String>,
    pub port: u16,
    pub config_file: PathBuf,
}

pub struct StatusFlow {
    store: ConfigStore,
}

impl StatusFlow {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    pub fn report(&self) -> StatusReport {
        let config_file = self.store.path().to_path_buf();
        let Some(config) = self.store.load_entry() else {
            return StatusReport::NotConfigured { config_file };
        };

        let credentials_file = config.credentials_path().map(PathBuf::from);
        let credentials_exist = credentials_file.as_ref().is_some_and(|path| path.exists());

        StatusReport::Configured(ConfiguredStatus {
            credentials_file,
            credentials_exist,
            port: config.port_or_default(),
            api_key: config.api_key,
            config_file,
        })
    }
}
