// src/core/protocol/message.rs

//! Defines the two wire message families, `Command` and `Response`, as
//! tagged unions. The variant set is closed, so the codec switches on the
//! tag directly and no dynamic dispatch is involved.

use crate::core::NumsetError;

/// A client request. `Insert` and `Delete` carry the number they operate on;
/// the remaining commands take no argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert(u64),
    Delete(u64),
    PrintAll,
    DeleteAll,
    Exit,
}

impl Command {
    /// The command's wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Insert(_) => "INSERT",
            Command::Delete(_) => "DELETE",
            Command::PrintAll => "PRINT_ALL",
            Command::DeleteAll => "DELETE_ALL",
            Command::Exit => "EXIT",
        }
    }
}

/// A daemon reply. `Data` carries its payload as newline-free lines; an
/// empty store produces an empty `lines` vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Success { message: String },
    Error { code: u32, message: String },
    Data { lines: Vec<String> },
}

impl Response {
    /// Builds a `Success` response with the given message.
    pub fn success(message: impl Into<String>) -> Self {
        Response::Success {
            message: message.into(),
        }
    }

    /// Builds an `Error` response from an error kind, carrying its wire code
    /// and human-readable message.
    pub fn error(err: &NumsetError) -> Self {
        Response::Error {
            code: err.wire_code(),
            message: err.to_string(),
        }
    }

    /// Builds a `Data` response from pre-formatted payload lines.
    pub fn data(lines: Vec<String>) -> Self {
        Response::Data { lines }
    }

    /// True for `Success` and `Data`.
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. } | Response::Data { .. })
    }
}

/// A single decoded frame: either message family may appear on the wire.
/// The daemon expects commands and the client expects responses; each side
/// treats the other family as a protocol error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireMessage {
    Command(Command),
    Response(Response),
}

impl From<Command> for WireMessage {
    fn from(c: Command) -> Self {
        WireMessage::Command(c)
    }
}

impl From<Response> for WireMessage {
    fn from(r: Response) -> Self {
        WireMessage::Response(r)
    }
}
