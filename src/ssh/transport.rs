//! Transport seam between the executor and the SSH library

use async_trait::async_trait;

use super::command::CommandOutput;
use super::config::SshConfig;
use crate::error::Result;

/// Runs a single command on the remote host
///
/// Implementations open whatever connection they need, run exactly one
/// command, and release the connection before returning on every path.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exec(&self, config: &SshConfig, command: &str) -> Result<CommandOutput>;
}
