// src/server/connection_loop.rs

//! Contains the main supervisor loop: accepting connections up to the
//! session ceiling, spawning one handler task per session, reclaiming
//! finished sessions, and draining them on graceful shutdown.

use super::context::ServerContext;
use crate::connection::ConnectionHandler;
use crate::core::state::ClientInfo;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// How long the shutdown path waits for live sessions to observe the stop
/// signal and exit before aborting the stragglers.
const SHUTDOWN_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// The main supervisor loop. Runs until the shutdown signal fires.
pub async fn run(ctx: ServerContext) {
    let mut session_id_counter: u64 = 0;
    let mut client_tasks = JoinSet::new();
    let mut shutdown_rx = ctx.shutdown_tx.subscribe();

    loop {
        // Hold a permit before polling the listener so new connection
        // attempts are simply not accepted while at the session ceiling.
        let permit = tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            Some(res) = client_tasks.join_next() => {
                reap(res);
                continue;
            }
            permit = Arc::clone(&ctx.connection_permits).acquire_owned() => {
                match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                }
            }
        };

        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            Some(res) = client_tasks.join_next() => reap(res),
            res = ctx.listener.accept() => match res {
                Ok((socket, _addr)) => {
                    session_id_counter = session_id_counter.wrapping_add(1);
                    let session_id = session_id_counter;
                    let state = ctx.state.clone();

                    state.stats.increment_total_connections();
                    state.clients.insert(
                        session_id,
                        ClientInfo {
                            session_id,
                            connected_at: Instant::now(),
                        },
                    );
                    info!(
                        "Accepted new connection (session {session_id}). Active connections: {}",
                        state.active_connection_count()
                    );

                    let shutdown_rx_session = ctx.shutdown_tx.subscribe();
                    client_tasks.spawn(async move {
                        // The permit rides along with the task and frees a
                        // slot when the session finishes.
                        let _permit = permit;
                        let mut handler = ConnectionHandler::new(
                            socket,
                            session_id,
                            state,
                            shutdown_rx_session,
                        );
                        if let Err(e) = handler.run().await {
                            warn!("Session {session_id} terminated unexpectedly: {e}");
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {e}");
                }
            },
        }
    }

    shutdown(ctx, client_tasks).await;
}

/// Reclaims one finished session task.
fn reap(res: Result<(), tokio::task::JoinError>) {
    if let Err(e) = res {
        if e.is_panic() {
            error!("A session handler panicked: {e:?}");
        }
    } else {
        debug!("Reclaimed a finished session task");
    }
}

/// Signals every live session to stop, closes the listener, and waits for
/// the sessions to drain. Sessions finish their in-flight command; only
/// after the drain timeout are the remaining tasks severed.
async fn shutdown(ctx: ServerContext, mut client_tasks: JoinSet<()>) {
    info!("Shutting down. Sending signal to all sessions.");
    let _ = ctx.shutdown_tx.send(());

    let socket_path = ctx.state.config.socket_path.clone();
    drop(ctx.listener);
    if let Err(e) = std::fs::remove_file(&socket_path) {
        debug!("Could not unlink socket file '{socket_path}': {e}");
    }

    let drain = async {
        while let Some(res) = client_tasks.join_next().await {
            reap(res);
        }
    };
    if tokio::time::timeout(SHUTDOWN_DRAIN_TIMEOUT, drain).await.is_err() {
        warn!("Timed out waiting for sessions to finish cleanly; aborting the rest.");
        client_tasks.shutdown().await;
    }
    info!("All client connections closed. Daemon shutdown complete.");
}
