//! Error types for hwmon-bridge

use thiserror::Error;

/// Main error type for the bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Configuration file missing, unreadable or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Neither a password nor a private key is configured
    #[error("No authentication method configured (require password or key_file)")]
    NoAuthMethod,

    /// SSH connection failed
    #[error("SSH connection error: {0}")]
    Connection(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// SSH key reading or parsing error
    #[error("SSH key error: {0}")]
    SshKey(String),

    /// Remote command exited unsuccessfully
    #[error("Failed to run command '{command}': {reason}, stderr: {stderr}")]
    Exec {
        command: String,
        reason: String,
        stderr: String,
    },

    /// Remote output could not be interpreted
    #[error("Invalid command output: {0}")]
    InvalidOutput(String),

    /// Client input rejected
    #[error("{0}")]
    Validation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Create a config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        BridgeError::Config(msg.into())
    }

    /// Create a connection error from a string
    pub fn connection(msg: impl Into<String>) -> Self {
        BridgeError::Connection(msg.into())
    }

    /// Create an authentication error from a string
    pub fn auth(msg: impl Into<String>) -> Self {
        BridgeError::Authentication(msg.into())
    }

    /// Create a validation error from a string
    pub fn validation(msg: impl Into<String>) -> Self {
        BridgeError::Validation(msg.into())
    }

    /// Whether the error was caused by client input rather than the remote side
    pub fn is_client_error(&self) -> bool {
        matches!(self, BridgeError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BridgeError::connection("failed to connect");
        assert_eq!(err.to_string(), "SSH connection error: failed to connect");

        let err = BridgeError::Exec {
            command: "sensors".to_string(),
            reason: "exit status 127".to_string(),
            stderr: "sensors: not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to run command 'sensors': exit status 127, stderr: sensors: not found"
        );
    }

    #[test]
    fn test_validation_is_client_error() {
        assert!(BridgeError::validation("Invalid JSON").is_client_error());
        assert!(!BridgeError::NoAuthMethod.is_client_error());
        assert!(!BridgeError::connection("refused").is_client_error());
    }
}
