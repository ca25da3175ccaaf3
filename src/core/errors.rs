// src/core/errors.rs

//! Defines the primary error type for the entire application.

use std::num::ParseIntError;
use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the daemon
/// and client. Using `thiserror` allows for clean error definitions and
/// automatic `From` trait implementations.
///
/// The `Display` text of each domain and protocol variant is also the
/// human-readable message carried in `ERROR` responses on the wire.
#[derive(Error, Debug, Clone)]
pub enum NumsetError {
    #[error("IO error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Invalid number format or non-positive integer")]
    InvalidNumber,

    #[error("Number already exists")]
    DuplicateNumber,

    #[error("Number not found")]
    NotFound,

    #[error("Failed to establish connection")]
    ConnectionFailed,

    #[error("Failed to serialize/deserialize message")]
    SerializationError,

    #[error("Invalid command format")]
    InvalidCommand,

    #[error("Failed to start listener: {0}")]
    ListenFailed(String),

    #[error("Failed to read from connection")]
    ReadFailed,

    #[error("Failed to write to connection")]
    WriteFailed,

    #[error("Operation timed out")]
    Timeout,
}

impl NumsetError {
    /// The numeric code carried by `RESP:ERROR` frames for this error kind.
    pub fn wire_code(&self) -> u32 {
        match self {
            NumsetError::InvalidNumber => 1,
            NumsetError::DuplicateNumber => 2,
            NumsetError::NotFound => 3,
            NumsetError::ConnectionFailed => 4,
            NumsetError::SerializationError => 5,
            NumsetError::InvalidCommand => 6,
            NumsetError::ListenFailed(_) => 7,
            NumsetError::Io(_) | NumsetError::ReadFailed => 9,
            NumsetError::WriteFailed => 10,
            NumsetError::Timeout => 11,
        }
    }

    /// Maps a wire error code back to an error kind. Codes that never
    /// legitimately cross the wire collapse to `SerializationError`.
    pub fn from_wire_code(code: u32) -> Self {
        match code {
            1 => NumsetError::InvalidNumber,
            2 => NumsetError::DuplicateNumber,
            3 => NumsetError::NotFound,
            4 => NumsetError::ConnectionFailed,
            6 => NumsetError::InvalidCommand,
            9 => NumsetError::ReadFailed,
            10 => NumsetError::WriteFailed,
            11 => NumsetError::Timeout,
            _ => NumsetError::SerializationError,
        }
    }

    /// True for errors that are fatal to the session's transport, as opposed
    /// to per-message protocol or domain errors the session survives.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            NumsetError::Io(_)
                | NumsetError::ConnectionFailed
                | NumsetError::ReadFailed
                | NumsetError::WriteFailed
                | NumsetError::Timeout
        )
    }

    /// Helper to check for non-critical peer disconnections.
    pub fn is_normal_disconnect(&self) -> bool {
        matches!(self, NumsetError::Io(e) if matches!(
            e.kind(),
            std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::BrokenPipe
                | std::io::ErrorKind::UnexpectedEof
                | std::io::ErrorKind::ConnectionAborted
        ))
    }
}

// `std::io::Error` is not cloneable; wrap it in an Arc for cheap, shared cloning.
impl From<std::io::Error> for NumsetError {
    fn from(e: std::io::Error) -> Self {
        NumsetError::Io(Arc::new(e))
    }
}

impl From<ParseIntError> for NumsetError {
    fn from(_: ParseIntError) -> Self {
        NumsetError::InvalidNumber
    }
}
