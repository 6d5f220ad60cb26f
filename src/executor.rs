//! Serialized remote command execution
//!
//! Every command goes through [`RemoteExecutor::run`], which holds a single
//! lock for the whole connect/exec/disconnect cycle. The remote hwmon
//! interface is not safe under concurrent sessions, so at most one is open at
//! any time.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::error::{BridgeError, Result};
use crate::ssh::{SshConfig, SshTransport, Transport};

/// Runs commands on the configured host one at a time
pub struct RemoteExecutor {
    /// Connection parameters, frozen after startup
    config: Arc<SshConfig>,

    transport: Arc<dyn Transport>,

    /// Held for the full lifetime of a remote session
    session_lock: Mutex<()>,
}

impl RemoteExecutor {
    pub fn new(config: SshConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            session_lock: Mutex::new(()),
        }
    }

    /// Executor over a real SSH transport
    pub fn ssh(config: SshConfig) -> Self {
        Self::new(config, Arc::new(SshTransport::new()))
    }

    /// Run `command` remotely and return its standard output
    ///
    /// Fails with [`BridgeError::NoAuthMethod`] before any network I/O when
    /// neither a password nor a key is configured, and with
    /// [`BridgeError::Exec`] when the command exits non-zero.
    #[instrument(skip(self), fields(host = %self.config.host))]
    pub async fn run(&self, command: &str) -> Result<String> {
        let _session = self.session_lock.lock().await;

        if !self.config.has_auth_method() {
            return Err(BridgeError::NoAuthMethod);
        }

        let output = self.transport.exec(&self.config, command).await?;

        if let Some(reason) = output.failure_reason() {
            return Err(BridgeError::Exec {
                command: command.to_string(),
                reason,
                stderr: output.stderr,
            });
        }

        debug!(stdout_len = output.stdout.len(), "remote command succeeded");
        Ok(output.stdout)
    }
}

impl std::fmt::Debug for RemoteExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteExecutor")
            .field("config", &self.config)
            .field("busy", &self.session_lock.try_lock().is_err())
            .finish_non_exhaustive()
    }
}
