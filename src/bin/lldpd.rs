//! lldpd - simulated LLDP daemon
//!
//! Serves a static inventory of hardware ports over the control socket so
//! that `lldpcli` and other clients have something to talk to.
//!
//! # Usage
//!
//! ```bash
//! # Serve the inventory described in lldpd.toml
//! lldpd --config lldpd.toml
//!
//! # Override the socket path from the config file
//! lldpd --config lldpd.toml --socket /tmp/lldpd.socket
//!
//! # Enable debug logging
//! RUST_LOG=lldpd=debug lldpd --config lldpd.toml
//! ```
//!
//! # Signal Handling
//!
//! - SIGTERM/SIGINT: Graceful shutdown

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lldpd::{spawn_registry, DaemonConfig, DaemonServer, Inventory};

/// Simulated LLDP daemon answering the control protocol
#[derive(Parser, Debug)]
#[command(name = "lldpd", version, about)]
struct Args {
    /// TOML file describing the socket and the hardware inventory
    #[arg(short, long)]
    config: PathBuf,

    /// Control socket path (overrides the config file)
    #[arg(short, long)]
    socket: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("lldpd=info".parse()?)
                .add_directive("lldp_protocol=info".parse()?),
        )
        .init();

    let mut config = DaemonConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    if let Some(socket) = args.socket {
        config.socket_path = socket;
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        pid = process::id(),
        ports = config.inventory.len(),
        "lldpd starting"
    );

    let cancel_token = CancellationToken::new();

    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown_signal().await {
            error!(error = %e, "Error waiting for shutdown signal");
        }
        info!("Shutdown signal received");
        shutdown_token.cancel();
    });

    let read_timeout = config.read_timeout();
    let registry = spawn_registry(Inventory::new(config.inventory));
    let server = DaemonServer::new(&config.socket_path, registry, cancel_token)
        .with_limits(read_timeout, config.max_message_size);

    if let Err(e) = server.run().await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("lldpd stopped");
    Ok(())
}

/// Waits for SIGTERM or SIGINT.
async fn wait_for_shutdown_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM"),
        _ = sigint.recv() => info!("Received SIGINT"),
    }
    Ok(())
}
