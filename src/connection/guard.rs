// src/connection/guard.rs

//! Defines `ConnectionGuard`, an RAII guard for session bookkeeping.

use crate::core::state::ServerState;
use std::sync::Arc;
use tracing::debug;

/// Ensures a session's registry entry is removed exactly once when its
/// handler's scope is exited, whatever path ended the loop.
pub struct ConnectionGuard {
    state: Arc<ServerState>,
    session_id: u64,
}

impl ConnectionGuard {
    pub(crate) fn new(state: Arc<ServerState>, session_id: u64) -> Self {
        Self { state, session_id }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if self.state.clients.remove(&self.session_id).is_some() {
            debug!(
                "ConnectionGuard dropping, cleaned up session {}",
                self.session_id
            );
        }
    }
}
