//! hwmon-bridge - Entry point
//!
//! Parses CLI arguments, loads the connection config, starts the HTTP server
//! and handles graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hwmon_bridge::config::{Args, Config};
use hwmon_bridge::error::Result;
use hwmon_bridge::executor::RemoteExecutor;
use hwmon_bridge::server::{router, AppState};
use hwmon_bridge::ssh::SshConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let args = Args::parse();

    // Startup is fatal without a valid config; nothing is bound yet
    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!(
                "Failed to load configuration from {}: {}",
                args.config.display(),
                e
            );
            return Err(e);
        }
    };

    info!(
        "Configuration loaded for {}@{}:{}",
        config.user, config.host, config.port
    );
    if !config.has_auth_method() {
        warn!("No password or key_file configured; remote commands will fail");
    }

    let executor = Arc::new(RemoteExecutor::ssh(SshConfig::from(config)));
    let app = router(AppState::new(executor));

    let addr = SocketAddr::new(args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Starting HTTP server on {}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("hwmon-bridge stopped");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to register SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C), shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
