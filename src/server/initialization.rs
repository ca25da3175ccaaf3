// src/server/initialization.rs

//! Handles daemon initialization: state setup and binding the listener.

use super::context::ServerContext;
use crate::config::Config;
use crate::core::NumsetError;
use crate::core::state::ServerState;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::net::UnixListener;
use tokio::sync::{Semaphore, broadcast};
use tracing::{info, warn};

/// Initializes all daemon components before starting the main loop.
/// A listener-bind failure here is fatal to startup and propagates to the
/// caller.
pub fn setup(config: Config) -> Result<ServerContext> {
    let (shutdown_tx, _) = broadcast::channel(1);

    let socket_path = config.socket_path.clone();
    remove_stale_socket(&socket_path)?;

    let listener = UnixListener::bind(&socket_path)
        .map_err(|e| NumsetError::ListenFailed(e.to_string()))
        .with_context(|| format!("Failed to bind Unix socket at '{socket_path}'"))?;
    info!("numset daemon listening on {socket_path}");

    let connection_permits = Arc::new(Semaphore::new(config.max_connections));
    let state = Arc::new(ServerState::new(config));
    info!(
        "Server state initialized (max {} concurrent sessions).",
        state.config.max_connections
    );

    Ok(ServerContext {
        state,
        listener,
        shutdown_tx,
        connection_permits,
    })
}

/// Unlinks a leftover socket file from a previous run. Binding would
/// otherwise fail with `AddrInUse` even though no daemon is listening.
fn remove_stale_socket(path: &str) -> Result<()> {
    if Path::new(path).exists() {
        warn!("Removing stale socket file at '{path}'");
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove stale socket file '{path}'"))?;
    }
    Ok(())
}
