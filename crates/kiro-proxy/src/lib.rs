//! Kiro Proxy - configure and launch a local OpenAI-compatible gateway backed
//! by Kiro credentials.
//!
//! This crate owns the configuration lifecycle only:
//! - find and validate a Kiro credentials file (`locator`, `credentials`)
//! - persist gateway settings to `~/.kiro-proxy/config.json` (`store`)
//! - the `install`, `init`, `start` and `status` flows
//!
//! Request serving lives in a separate component that `start` launches with
//! `KIRO_CREDS_FILE`, `PROXY_API_KEY` and `PORT` in its environment.

pub mod commands;
pub mod credentials;
pub mod error;
pub mod install;
pub mod locator;
pub mod paths;
pub mod start;
pub mod status;
pub mod store;
pub mod ui;
pub mod wizard;

pub use error::{CredentialSourceError, ProxyError, Result};
pub use install::{InstallFlow, InstallOutcome, InstallRequest};
pub use locator::CredentialLocator;
pub use paths::ProxyPaths;
pub use start::{Handoff, ProcessServer, ServeOutcome, ServingComponent, StartFlow};
pub use status::{StatusFlow, StatusReport};
pub use store::{ConfigStore, GatewayConfig, LoadOutcome, DEFAULT_PORT};
pub use wizard::{InitWizard, Prompter};
