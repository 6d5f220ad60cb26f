//! Captured output of a remote command

use russh::ChannelMsg;

/// Output from a command execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output from the command
    pub stdout: String,

    /// Standard error from the command
    pub stderr: String,

    /// Exit code of the command (if the server reported one)
    pub exit_code: Option<u32>,
}

impl CommandOutput {
    /// Create a new empty CommandOutput
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful output with exit code 0
    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }

    /// Check if the command succeeded
    ///
    /// A command that exited without reporting a status is not successful.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Human-readable reason for a failed command, `None` on success
    pub fn failure_reason(&self) -> Option<String> {
        if self.success() {
            return None;
        }
        Some(match self.exit_code {
            Some(code) => format!("exit status {}", code),
            None => "remote command exited without exit status".to_string(),
        })
    }
}

/// Raw channel output, decoded once the channel closes
///
/// Packet boundaries can split a multi-byte character, so the streams are
/// buffered as bytes rather than decoded chunk by chunk.
#[derive(Debug, Default)]
pub(crate) struct OutputCollector {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    exit_code: Option<u32>,
}

impl OutputCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Fold one channel message into the buffers
    pub(crate) fn record(&mut self, msg: ChannelMsg) {
        match msg {
            ChannelMsg::Data { data } => {
                self.stdout.extend_from_slice(&data);
            }
            // ext == 1 is SSH_EXTENDED_DATA_STDERR
            ChannelMsg::ExtendedData { data, ext: 1 } => {
                self.stderr.extend_from_slice(&data);
            }
            ChannelMsg::ExitStatus { exit_status } => {
                self.exit_code = Some(exit_status);
            }
            _ => {}
        }
    }

    pub(crate) fn finish(self) -> CommandOutput {
        CommandOutput {
            stdout: String::from_utf8_lossy(&self.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&self.stderr).into_owned(),
            exit_code: self.exit_code,
        }
    }
}
