// src/core/state.rs

//! Defines the central `ServerState` struct, holding all shared daemon-wide
//! state, plus per-session bookkeeping and server statistics.

use crate::config::Config;
use crate::core::processor::CommandProcessor;
use crate::core::storage::NumberStore;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// The central struct holding all shared state. Wrapped in an `Arc` and
/// passed to the supervisor and every session handler; there is no ambient
/// global state in the core.
#[derive(Debug)]
pub struct ServerState {
    /// The daemon's configuration, fixed for the process lifetime.
    pub config: Config,
    /// The authoritative number store.
    pub store: Arc<NumberStore>,
    /// The command dispatcher bound to the store.
    pub processor: CommandProcessor,
    /// All live sessions, keyed by session id. Entries are removed by each
    /// session's `ConnectionGuard` when its handler exits.
    pub clients: DashMap<u64, ClientInfo>,
    /// Daemon-wide counters.
    pub stats: StatsState,
}

impl ServerState {
    pub fn new(config: Config) -> Self {
        let store = Arc::new(NumberStore::new());
        let processor = CommandProcessor::new(store.clone());
        Self {
            config,
            store,
            processor,
            clients: DashMap::new(),
            stats: StatsState::new(),
        }
    }

    /// The number of currently-live sessions.
    pub fn active_connection_count(&self) -> usize {
        self.clients.len()
    }
}

/// Bookkeeping for one live session.
#[derive(Debug)]
pub struct ClientInfo {
    pub session_id: u64,
    pub connected_at: Instant,
}

/// Holds all state and logic related to daemon-wide statistics.
#[derive(Debug, Default)]
pub struct StatsState {
    total_connections: AtomicU64,
    total_commands: AtomicU64,
}

impl StatsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically increments the total number of connections accepted.
    pub fn increment_total_connections(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_total_connections(&self) -> u64 {
        self.total_connections.load(Ordering::Relaxed)
    }

    /// Atomically increments the total number of commands processed.
    pub fn increment_total_commands(&self) {
        self.total_commands.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_total_commands(&self) -> u64 {
        self.total_commands.load(Ordering::Relaxed)
    }
}
