// src/server/mod.rs

//! Daemon lifecycle: setup, the supervisor loop, and a handle-based facade
//! for the process-entry glue (start / run / stop / introspection).

use crate::config::Config;
use crate::core::state::ServerState;
use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;
use tracing::error;

mod connection_loop;
mod context;
mod initialization;

/// The main daemon startup function: sets up state and the listener, then
/// runs the supervisor loop until stopped.
pub async fn run(config: Config) -> Result<()> {
    let mut daemon = Daemon::start(config)?;
    daemon.run().await;
    Ok(())
}

/// A started daemon. `start` binds the listener; `run` blocks the calling
/// task until the daemon is stopped via a [`DaemonController`].
pub struct Daemon {
    state: Arc<ServerState>,
    shutdown_tx: broadcast::Sender<()>,
    context: Option<context::ServerContext>,
    running: Arc<AtomicBool>,
}

impl Daemon {
    /// Binds the transport listener and initializes shared state. Failure
    /// to start the listener is fatal and propagates to the caller.
    pub fn start(config: Config) -> Result<Self> {
        let ctx = initialization::setup(config)?;
        Ok(Self {
            state: ctx.state.clone(),
            shutdown_tx: ctx.shutdown_tx.clone(),
            context: Some(ctx),
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Drives the supervisor loop until a stop is requested. Returns once
    /// all sessions have drained.
    pub async fn run(&mut self) {
        let Some(ctx) = self.context.take() else {
            error!("Cannot run daemon: supervisor loop already consumed");
            return;
        };
        connection_loop::run(ctx).await;
        self.running.store(false, Ordering::Release);
    }

    /// A cloneable handle for stopping the daemon from other tasks (signal
    /// handlers, tests).
    pub fn controller(&self) -> DaemonController {
        DaemonController {
            shutdown_tx: self.shutdown_tx.clone(),
            running: self.running.clone(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// The number of currently-live client sessions.
    pub fn active_connection_count(&self) -> usize {
        self.state.active_connection_count()
    }

    /// The shared daemon state, exposed for introspection and tests.
    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }
}

/// Requests a graceful stop of a running [`Daemon`].
#[derive(Clone)]
pub struct DaemonController {
    shutdown_tx: broadcast::Sender<()>,
    running: Arc<AtomicBool>,
}

impl DaemonController {
    /// Signals the supervisor and every live session to stop. Sessions
    /// finish their in-flight command before exiting.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
