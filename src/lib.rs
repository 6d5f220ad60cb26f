//! hwmon-bridge - HTTP control panel for a remote machine's sensors and fans
//!
//! This crate serves a small web page and JSON API that read `sensors` output
//! and read or set the PWM fan duty on a remote Linux host. Every operation is
//! a fixed shell command run over SSH with password and/or key authentication.
//!
//! # HTTP API
//!
//! - `GET /api/sensors` - raw `sensors` output as text
//! - `GET /api/fan` - current duty as `{"speed": n}`
//! - `POST /api/fan` - set both PWM channels from `{"speed": n}`, `n` in `0..=255`
//!
//! Remote sessions are serialized: at most one SSH session is open at a time
//! across all requests.
//!
//! # Example Usage
//!
//! ```bash
//! CONFIG_PATH=/etc/hwmon-bridge/config.json PORT=8080 hwmon-bridge
//! ```
//!
//! with a config file such as
//!
//! ```json
//! {"host": "192.168.1.20", "user": "root", "key_file": "/root/.ssh/id_ed25519"}
//! ```

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod executor;
pub mod server;
pub mod ssh;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use commands::FanSpeed;
pub use config::{Args, Config};
pub use error::{BridgeError, Result};
pub use executor::RemoteExecutor;
pub use server::{router, AppState};
pub use ssh::{CommandOutput, SshConfig, SshTransport, Transport};
