// src/server/context.rs

use crate::core::state::ServerState;
use std::sync::Arc;
use tokio::net::UnixListener;
use tokio::sync::{Semaphore, broadcast};

/// Holds all the initialized state required to run the daemon's main loop.
pub struct ServerContext {
    pub state: Arc<ServerState>,
    pub listener: UnixListener,
    pub shutdown_tx: broadcast::Sender<()>,
    /// One permit per allowed concurrent session; the accept loop holds a
    /// permit before polling the listener, so a full daemon simply stops
    /// accepting until capacity frees up.
    pub connection_permits: Arc<Semaphore>,
}
