//! Handoff into the serving component.
//!
//! [`StartFlow`] re-validates the stored configuration, resolves the port and
//! builds the environment the server reads. The server itself is behind the
//! [`ServingComponent`] trait; [`ProcessServer`] runs it as a child process.

use crate::error::{ProxyError, Result};
use crate::store::{ConfigStore, DEFAULT_PORT};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::{info, warn};

/// Absolute path of the credentials file.
pub const CREDS_FILE_ENV: &str = "KIRO_CREDS_FILE";
/// Bearer key the server must enforce on its routes.
pub const API_KEY_ENV: &str = "PROXY_API_KEY";
/// Port the server binds.
pub const PORT_ENV: &str = "PORT";
/// Overrides the serving component executable.
pub const SERVER_COMMAND_ENV: &str = "KIRO_PROXY_SERVER";
pub const DEFAULT_SERVER_COMMAND: &str = "kiro-gateway";

/// Everything the serving component needs, as an explicit environment map.
#[derive(Clone, PartialEq, Eq)]
pub struct Handoff {
    pub port: u16,
    pub credentials_file: PathBuf,
    pub api_key: String,
    pub env: BTreeMap<String, String>,
}

impl Handoff {
    pub fn new(port: u16, credentials_file: PathBuf, api_key: String) -> Self {
        let env = BTreeMap::from([
            (
                CREDS_FILE_ENV.to_string(),
                credentials_file.display().to_string(),
            ),
            (API_KEY_ENV.to_string(), api_key.clone()),
            (PORT_ENV.to_string(), port.to_string()),
        ]);

        Self {
            port,
            credentials_file,
            api_key,
            env,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://localhost:{}/v1", self.port)
    }
}

impl std::fmt::Debug for Handoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let env: BTreeMap<&str, &str> = self
            .env
            .iter()
            .map(|(key, value)| {
                let shown = if key == API_KEY_ENV {
                    "[REDACTED]"
                } else {
                    value.as_str()
                };
                (key.as_str(), shown)
            })
            .collect();

        f.debug_struct("Handoff")
            .field("port", &self.port)
            .field("credentials_file", &self.credentials_file)
            .field("api_key", &"[REDACTED]")
            .field("env", &env)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeOutcome {
    /// The server stopped on its own with a success status.
    Exited,
    /// The operator pressed Ctrl+C. A clean shutdown.
    Interrupted,
}

#[async_trait]
pub trait ServingComponent: Send + Sync {
    /// Run until the server stops or the operator interrupts it.
    async fn serve(&self, handoff: &Handoff) -> Result<ServeOutcome>;
}

/// Runs the serving component as a child process with the handoff
/// environment applied.
#[derive(Debug, Clone)]
pub struct ProcessServer {
    program: OsString,
    args: Vec<OsString>,
}

impl ProcessServer {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Use `KIRO_PROXY_SERVER` when set, `kiro-gateway` otherwise.
    pub fn from_env() -> Self {
        let program = std::env::var_os(SERVER_COMMAND_ENV)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| OsString::from(DEFAULT_SERVER_COMMAND));
        Self::new(program)
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn display_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

#[async_trait]
impl ServingComponent for ProcessServer {
    async fn serve(&self, handoff: &Handoff) -> Result<ServeOutcome> {
        let name = self.display_name();
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .envs(&handoff.env)
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| ProxyError::Handoff(format!("failed to launch {}: {}", name, err)))?;

        info!(program = %name, port = handoff.port, pid = ?child.id(), "serving component started");

        // Ctrl+C reaches the child too, so both arms can be ready together.
        tokio::select! {
            biased;

            _ = tokio::signal::ctrl_c() => {
                if let Err(err) = child.kill().await {
                    warn!(program = %name, error = %err, "failed to stop serving component");
                }
                Ok(ServeOutcome::Interrupted)
            }
            status = child.wait() => {
                let status = status
                    .map_err(|err| ProxyError::Handoff(format!("{}: {}", name, err)))?;
                if status.success() {
                    Ok(ServeOutcome::Exited)
                } else if ended_by_interrupt(&status) {
                    info!(program = %name, %status, "serving component interrupted");
                    Ok(ServeOutcome::Interrupted)
                } else {
                    Err(ProxyError::Handoff(format!("{} exited with {}", name, status)))
                }
            }
        }
    }
}

/// Shell convention for "terminated by SIGINT".
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[cfg(unix)]
fn ended_by_interrupt(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;

    status.signal() == Some(libc::SIGINT) || status.code() == Some(INTERRUPTED_EXIT_CODE)
}

#[cfg(not(unix))]
fn ended_by_interrupt(status: &ExitStatus) -> bool {
    status.code() == Some(INTERRUPTED_EXIT_CODE)
}

pub struct StartFlow<S> {
    store: ConfigStore,
    server: S,
}

impl<S: ServingComponent> StartFlow<S> {
    pub fn new(store: ConfigStore, server: S) -> Self {
        Self { store, server }
    }

    /// Check the stored configuration and build the handoff.
    ///
    /// Port precedence: `requested_port`, then the stored port, then 8000.
    pub fn prepare(&self, requested_port: Option<u16>) -> Result<Handoff> {
        let config = self.store.load();
        let credentials_file = config
            .credentials_path()
            .map(PathBuf::from)
            .ok_or(ProxyError::NotConfigured)?;

        if !credentials_file.exists() {
            return Err(ProxyError::CredentialsMissing {
                path: credentials_file,
            });
        }

        let port = requested_port.or(config.port).unwrap_or(DEFAULT_PORT);
        let api_key = config.api_key.unwrap_or_default();
        if api_key.is_empty() {
            warn!("no API key configured; the gateway will accept an empty bearer key");
        }

        Ok(Handoff::new(port, credentials_file, api_key))
    }

    pub async fn launch(&self, handoff: &Handoff) -> Result<ServeOutcome> {
        self.server.serve(handoff).await
    }

    pub async fn start(&self, requested_port: Option<u16>) -> Result<ServeOutcome> {
        let handoff = self.prepare(requested_port)?;
        self.launch(&handoff).await
    }
}
