//! SSH transport
//!
//! Opens a fresh connection per command: connect, authenticate, run one
//! command on a session channel, disconnect.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::keys::{load_secret_key, PrivateKey, PrivateKeyWithHashAlg};
use russh::Disconnect;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::command::{CommandOutput, OutputCollector};
use super::config::SshConfig;
use super::handler::SshHandler;
use super::transport::Transport;
use crate::config::CONNECTION_TIMEOUT_SECS;
use crate::error::{BridgeError, Result};

/// Authentication methods offered to the server, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Password,
    PublicKey,
}

/// Methods registered for `config`; both are offered when both are set
pub fn auth_methods(config: &SshConfig) -> Vec<AuthMethod> {
    let mut methods = Vec::with_capacity(2);
    if config.password.is_some() {
        methods.push(AuthMethod::Password);
    }
    if config.key_path.is_some() {
        methods.push(AuthMethod::PublicKey);
    }
    methods
}

/// Transport backed by russh
#[derive(Debug, Clone)]
pub struct SshTransport {
    connect_timeout: Duration,
}

impl SshTransport {
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
        }
    }

    /// Override the connection timeout
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Connect and authenticate within the connection timeout
    async fn connect(
        &self,
        config: &SshConfig,
        key: Option<Arc<PrivateKey>>,
    ) -> Result<Handle<SshHandler>> {
        let addr = config.address();
        debug!("Connecting to SSH server {}...", addr);

        match timeout(self.connect_timeout, self.do_connect(config, key)).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "SSH connection to {} timed out after {:?}",
                    addr, self.connect_timeout
                );
                Err(BridgeError::connection(format!(
                    "Connection timeout after {:?}",
                    self.connect_timeout
                )))
            }
        }
    }

    async fn do_connect(
        &self,
        config: &SshConfig,
        key: Option<Arc<PrivateKey>>,
    ) -> Result<Handle<SshHandler>> {
        let ssh_config = Arc::new(client::Config::default());

        let mut session = client::connect(
            ssh_config,
            (config.host.as_str(), config.port),
            SshHandler::new(),
        )
        .await
        .map_err(|e| BridgeError::connection(e.to_string()))?;

        if let Err(e) = authenticate(&mut session, config, key).await {
            disconnect(session).await;
            return Err(e);
        }

        debug!("Authenticated as {}@{}", config.username, config.address());
        Ok(session)
    }
}

impl Default for SshTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for SshTransport {
    async fn exec(&self, config: &SshConfig, command: &str) -> Result<CommandOutput> {
        // An unreadable key fails the call even if the password would be accepted
        let key = load_key(config)?;
        let session = self.connect(config, key).await?;
        let result = run_command(&session, command).await;
        disconnect(session).await;
        result
    }
}

/// Read and parse the configured private key, if any
fn load_key(config: &SshConfig) -> Result<Option<Arc<PrivateKey>>> {
    let Some(key_path) = config.key_path.as_deref() else {
        return Ok(None);
    };
    let key = load_secret_key(key_path, None).map_err(|e| {
        BridgeError::SshKey(format!(
            "unable to load private key {}: {}",
            key_path.display(),
            e
        ))
    })?;
    Ok(Some(Arc::new(key)))
}

/// Try each registered method until the server accepts one
async fn authenticate(
    session: &mut Handle<SshHandler>,
    config: &SshConfig,
    key: Option<Arc<PrivateKey>>,
) -> Result<()> {
    let methods = auth_methods(config);
    if methods.is_empty() {
        return Err(BridgeError::NoAuthMethod);
    }

    let mut last_error = None;
    for method in methods {
        let accepted = match method {
            AuthMethod::Password => authenticate_password(session, config).await,
            AuthMethod::PublicKey => authenticate_key(session, config, key.clone()).await,
        };
        match accepted {
            Ok(true) => {
                info!("{:?} authentication successful", method);
                return Ok(());
            }
            Ok(false) => {
                debug!("{:?} authentication rejected", method);
                last_error = Some(BridgeError::auth(format!(
                    "{:?} authentication rejected",
                    method
                )));
            }
            Err(e) => {
                warn!("{:?} authentication failed: {}", method, e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| BridgeError::auth("all authentication methods failed")))
}

async fn authenticate_password(
    session: &mut Handle<SshHandler>,
    config: &SshConfig,
) -> Result<bool> {
    let Some(password) = config.password.as_deref() else {
        return Ok(false);
    };
    debug!(
        "Attempting password authentication for user '{}'",
        config.username
    );
    let auth_result = session
        .authenticate_password(&config.username, password)
        .await
        .map_err(|e| BridgeError::auth(e.to_string()))?;
    Ok(auth_result.success())
}

async fn authenticate_key(
    session: &mut Handle<SshHandler>,
    config: &SshConfig,
    key: Option<Arc<PrivateKey>>,
) -> Result<bool> {
    let Some(key) = key else {
        return Ok(false);
    };
    debug!(
        "Attempting key authentication for user '{}'",
        config.username
    );

    let hash_alg = session
        .best_supported_rsa_hash()
        .await
        .ok()
        .flatten()
        .flatten();

    let auth_result = session
        .authenticate_publickey(
            &config.username,
            PrivateKeyWithHashAlg::new(key, hash_alg),
        )
        .await
        .map_err(|e| BridgeError::auth(e.to_string()))?;
    Ok(auth_result.success())
}

/// Run one command on a new session channel and collect its output
async fn run_command(session: &Handle<SshHandler>, command: &str) -> Result<CommandOutput> {
    let mut channel = session
        .channel_open_session()
        .await
        .map_err(|e| BridgeError::connection(format!("failed to create SSH session: {}", e)))?;

    debug!("Executing remote command: {}", command);
    channel
        .exec(true, command)
        .await
        .map_err(|e| BridgeError::connection(format!("failed to exec command: {}", e)))?;

    let mut collector = OutputCollector::new();
    while let Some(msg) = channel.wait().await {
        if matches!(msg, russh::ChannelMsg::Close) {
            break;
        }
        collector.record(msg);
    }
    let output = collector.finish();

    debug!(
        "Command completed: exit_code={:?}, stdout_len={}, stderr_len={}",
        output.exit_code,
        output.stdout.len(),
        output.stderr.len()
    );

    Ok(output)
}

async fn disconnect(session: Handle<SshHandler>) {
    if let Err(e) = session
        .disconnect(Disconnect::ByApplication, "", "English")
        .await
    {
        debug!("SSH disconnect failed: {}", e);
    }
}
