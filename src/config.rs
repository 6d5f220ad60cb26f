//! Configuration and CLI argument parsing for hwmon-bridge

use std::fmt;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error::{BridgeError, Result};

/// Default SSH port
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Connection timeout in seconds (connect, handshake and authentication)
pub const CONNECTION_TIMEOUT_SECS: u64 = 5;

/// hwmon-bridge CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "hwmon-bridge")]
#[command(version)]
#[command(about = "HTTP control panel for sensors and fan speed on a remote host over SSH")]
pub struct Args {
    /// Path to the JSON connection config
    #[arg(long, default_value = "config.json", env = "CONFIG_PATH")]
    pub config: PathBuf,

    /// HTTP listen port
    #[arg(long, default_value = "8080", env = "PORT")]
    pub port: u16,

    /// HTTP listen address
    #[arg(long, default_value = "0.0.0.0", env = "BIND_ADDRESS")]
    pub bind: IpAddr,
}

/// Connection parameters as read from the config file
#[derive(Clone, Deserialize)]
pub struct Config {
    /// SSH host
    pub host: String,

    /// SSH port
    #[serde(default = "default_port")]
    pub port: u16,

    /// SSH username
    pub user: String,

    /// SSH password
    #[serde(default)]
    pub password: Option<String>,

    /// Path to SSH private key
    #[serde(default)]
    pub key_file: Option<PathBuf>,
}

impl Config {
    /// Load and normalise the config file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::config(format!("unable to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
            .map_err(|e| BridgeError::config(format!("{}: {}", path.display(), e)))
    }

    /// Parse config from a JSON document
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let raw: Config = serde_json::from_str(json)?;
        Ok(Config {
            host: raw.host,
            port: if raw.port == 0 { DEFAULT_SSH_PORT } else { raw.port },
            user: raw.user,
            password: sanitize_password(raw.password),
            key_file: raw.key_file.filter(|p| !p.as_os_str().is_empty()),
        })
    }

    /// Whether at least one credential is configured
    pub fn has_auth_method(&self) -> bool {
        self.password.is_some() || self.key_file.is_some()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("key_file", &self.key_file)
            .finish()
    }
}

fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

/// Sanitize password: return None if empty
fn sanitize_password(password: Option<String>) -> Option<String> {
    password.filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_port_applied() {
        let config = Config::from_json(r#"{"host": "10.0.0.2", "user": "root", "password": "x"}"#)
            .unwrap();
        assert_eq!(config.port, 22);
        assert_eq!(config.host, "10.0.0.2");
        assert_eq!(config.user, "root");
    }

    #[test]
    fn test_zero_port_means_default() {
        let config =
            Config::from_json(r#"{"host": "nas", "port": 0, "user": "root", "password": "x"}"#)
                .unwrap();
        assert_eq!(config.port, 22);
    }

    #[test]
    fn test_explicit_port() {
        let config =
            Config::from_json(r#"{"host": "nas", "port": 2222, "user": "root", "password": "x"}"#)
                .unwrap();
        assert_eq!(config.port, 2222);
    }

    #[test]
    fn test_empty_credentials_are_unset() {
        let config = Config::from_json(
            r#"{"host": "nas", "user": "root", "password": "", "key_file": ""}"#,
        )
        .unwrap();
        assert!(config.password.is_none());
        assert!(config.key_file.is_none());
        assert!(!config.has_auth_method());
    }

    #[test]
    fn test_key_file_only() {
        let config = Config::from_json(
            r#"{"host": "nas", "user": "root", "key_file": "/root/.ssh/id_ed25519"}"#,
        )
        .unwrap();
        assert!(config.has_auth_method());
        assert_eq!(
            config.key_file.as_deref(),
            Some(Path::new("/root/.ssh/id_ed25519"))
        );
    }

    #[test]
    fn test_out_of_range_port_rejected() {
        assert!(
            Config::from_json(r#"{"host": "nas", "port": 70000, "user": "root"}"#).is_err()
        );
    }

    #[test]
    fn test_missing_host_rejected() {
        assert!(Config::from_json(r#"{"user": "root"}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"host": "192.168.1.10", "port": 22, "user": "root", "password": "secret"}}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.host, "192.168.1.10");
        assert_eq!(config.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
        assert!(err.to_string().contains("unable to read"));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"host\": ").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config =
            Config::from_json(r#"{"host": "nas", "user": "root", "password": "hunter2"}"#).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_sanitize_password() {
        assert_eq!(
            sanitize_password(Some("secret".to_string())),
            Some("secret".to_string())
        );
        assert_eq!(sanitize_password(Some("".to_string())), None);
        assert_eq!(sanitize_password(None), None);
    }

    #[test]
    fn test_args_from_flags() {
        let args = Args::try_parse_from([
            "hwmon-bridge",
            "--config",
            "/etc/hwmon-bridge.json",
            "--port",
            "9000",
            "--bind",
            "127.0.0.1",
        ])
        .unwrap();
        assert_eq!(args.port, 9000);
        assert_eq!(args.config, PathBuf::from("/etc/hwmon-bridge.json"));
        assert_eq!(args.bind.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_args_reject_invalid_port() {
        assert!(Args::try_parse_from(["hwmon-bridge", "--port", "notaport"]).is_err());
    }
}
