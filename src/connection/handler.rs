// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of one
//! client session.

use super::guard::ConnectionGuard;
use crate::core::NumsetError;
use crate::core::protocol::{Command, Response, WireCodec, WireMessage};
use crate::core::state::ServerState;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::broadcast;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// The next step for the session loop to take.
enum NextAction {
    Continue,
    ExitLoop,
}

/// Owns one client connection and runs its command loop until the client
/// disconnects, sends EXIT, or the daemon shuts down.
///
/// Generic over the stream type so the transport stays at the edge; the
/// daemon hands in a `UnixStream`, tests may hand in anything duplex.
pub struct ConnectionHandler<S> {
    framed: Framed<S, WireCodec>,
    session_id: u64,
    state: Arc<ServerState>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> ConnectionHandler<S> {
    /// Creates a new `ConnectionHandler` over an established stream.
    pub fn new(
        stream: S,
        session_id: u64,
        state: Arc<ServerState>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        let buffer_size = state.config.buffer_size;
        Self {
            framed: Framed::with_capacity(stream, WireCodec, buffer_size),
            session_id,
            state,
            shutdown_rx,
        }
    }

    /// The main event loop for the session. The shutdown signal is checked
    /// once per iteration; an in-flight command always completes and is
    /// answered before the check runs again.
    pub async fn run(&mut self) -> Result<(), NumsetError> {
        let _guard = ConnectionGuard::new(self.state.clone(), self.session_id);
        debug!("Session {} started", self.session_id);

        loop {
            tokio::select! {
                // Prioritize the shutdown signal over new frames.
                biased;
                _ = self.shutdown_rx.recv() => {
                    info!("Session {} received shutdown signal", self.session_id);
                    break;
                }
                result = self.framed.next() => {
                    match result {
                        Some(Ok(Ok(message))) => match self.process_message(message).await {
                            Ok(NextAction::Continue) => {}
                            Ok(NextAction::ExitLoop) => break,
                            Err(e) if e.is_transport() => return Err(e),
                            Err(e) => self.send_error(e).await?,
                        },
                        // Malformed but readable frame, already consumed by
                        // the codec: answer with an error response and keep
                        // the session open.
                        Some(Ok(Err(e))) => self.send_error(e).await?,
                        Some(Err(e)) => {
                            if e.is_normal_disconnect() {
                                debug!("Session {} closed by peer: {e}", self.session_id);
                            } else {
                                warn!("Session {} transport error: {e}", self.session_id);
                            }
                            break;
                        }
                        None => {
                            debug!("Session {} closed by peer", self.session_id);
                            break;
                        }
                    }
                }
            }
        }

        debug!("Session {} finished", self.session_id);
        Ok(())
    }

    /// Dispatches one decoded frame and sends the response.
    async fn process_message(&mut self, message: WireMessage) -> Result<NextAction, NumsetError> {
        // Only commands are valid in this direction.
        let WireMessage::Command(command) = message else {
            return Err(NumsetError::SerializationError);
        };
        debug!(
            "Session {}: received command: {}",
            self.session_id,
            command.name()
        );

        self.state.stats.increment_total_commands();
        let is_exit = matches!(command, Command::Exit);
        let response = self.state.processor.process(&command);
        self.framed.send(response.into()).await?;

        if is_exit {
            info!("Session {} requested exit", self.session_id);
            Ok(NextAction::ExitLoop)
        } else {
            Ok(NextAction::Continue)
        }
    }

    /// Sends an error response back to the client.
    async fn send_error(&mut self, e: NumsetError) -> Result<(), NumsetError> {
        debug!("Session {}: sending error response: {e}", self.session_id);
        self.framed
            .send(Response::error(&e).into())
            .await
    }
}
