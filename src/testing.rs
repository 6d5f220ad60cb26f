//! Instrumented in-memory transport for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{BridgeError, Result};
use crate::ssh::{CommandOutput, SshConfig, Transport};

/// Records every command and how many sessions were open at once
pub(crate) struct FakeTransport {
    output: Option<CommandOutput>,
    delay: Duration,
    commands: Mutex<Vec<String>>,
    open: AtomicUsize,
    max_open: AtomicUsize,
}

impl FakeTransport {
    pub(crate) fn with_output(output: CommandOutput) -> Self {
        Self {
            output: Some(output),
            delay: Duration::ZERO,
            commands: Mutex::new(Vec::new()),
            open: AtomicUsize::new(0),
            max_open: AtomicUsize::new(0),
        }
    }

    pub(crate) fn replying(stdout: &str) -> Self {
        Self::with_output(CommandOutput::with_stdout(stdout))
    }

    /// Every exec fails as if the host refused the connection
    pub(crate) fn failing() -> Self {
        Self {
            output: None,
            ..Self::replying("")
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.commands.lock().unwrap().len()
    }

    pub(crate) fn max_concurrent(&self) -> usize {
        self.max_open.load(Ordering::SeqCst)
    }
}

/// Decrements the open-session count even when the exec future is dropped
struct OpenSession<'a>(&'a AtomicUsize);

impl Drop for OpenSession<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn exec(&self, _config: &SshConfig, command: &str) -> Result<CommandOutput> {
        self.commands.lock().unwrap().push(command.to_string());

        let now_open = self.open.fetch_add(1, Ordering::SeqCst) + 1;
        let _session = OpenSession(&self.open);
        self.max_open.fetch_max(now_open, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.output
            .clone()
            .ok_or_else(|| BridgeError::connection("connection refused"))
    }
}
