// src/connection/mod.rs

//! Per-connection session handling: the read-decode-dispatch-respond loop
//! and the RAII guard that deregisters a session on every exit path.

mod guard;
mod handler;

pub use guard::ConnectionGuard;
pub use handler::ConnectionHandler;
