//! SSH transport module
//!
//! One connection per command: the transport connects, authenticates with the
//! configured password and/or key, runs a single command and disconnects.

pub mod command;
pub mod config;
pub mod connection;
pub mod handler;
pub mod transport;

// Re-exports
pub use command::CommandOutput;
pub use config::SshConfig;
pub use connection::{auth_methods, AuthMethod, SshTransport};
pub use handler::SshHandler;
pub use transport::Transport;
