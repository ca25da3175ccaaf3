// src/client.rs

//! The client-side convenience API consumed by the interactive UI: one
//! connection to the daemon, one command sent and one response awaited per
//! call, plain text in and out.

use crate::core::NumsetError;
use crate::core::protocol::{Command, Response, WireCodec, WireMessage};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::UnixStream;
use tokio_util::codec::Framed;
use tracing::{debug, info};

/// Text shown for a PRINT_ALL of an empty store.
const MSG_NO_NUMBERS: &str = "No numbers stored.";

/// A connected client session with the daemon.
#[derive(Debug)]
pub struct DaemonClient {
    framed: Framed<UnixStream, WireCodec>,
    timeout: Duration,
}

impl DaemonClient {
    /// Connects to the daemon's socket. Fails with `ConnectionFailed` if the
    /// daemon is not reachable, or `Timeout` if it does not answer in time.
    pub async fn connect(socket_path: &str, timeout: Duration) -> Result<Self, NumsetError> {
        let stream = tokio::time::timeout(timeout, UnixStream::connect(socket_path))
            .await
            .map_err(|_| NumsetError::Timeout)?
            .map_err(|_| NumsetError::ConnectionFailed)?;
        info!("Connected to daemon at {socket_path}");
        Ok(Self {
            framed: Framed::new(stream, WireCodec),
            timeout,
        })
    }

    /// Inserts a number. Returns the daemon's confirmation message.
    pub async fn insert_number(&mut self, number: u64) -> Result<String, NumsetError> {
        validate_number(number)?;
        let response = self.send_command(Command::Insert(number)).await?;
        into_message(response)
    }

    /// Deletes a number. Returns the daemon's confirmation message.
    pub async fn delete_number(&mut self, number: u64) -> Result<String, NumsetError> {
        validate_number(number)?;
        let response = self.send_command(Command::Delete(number)).await?;
        into_message(response)
    }

    /// Lists all stored numbers, one `number:timestamp` line per entry in
    /// ascending numeric order.
    pub async fn print_all_numbers(&mut self) -> Result<String, NumsetError> {
        let response = self.send_command(Command::PrintAll).await?;
        match response {
            Response::Data { lines } if lines.is_empty() => Ok(MSG_NO_NUMBERS.to_string()),
            Response::Data { lines } => {
                let mut out = String::new();
                for line in &lines {
                    out.push_str(line);
                    out.push('\n');
                }
                Ok(out)
            }
            other => into_message(other),
        }
    }

    /// Clears the store. Returns the daemon's confirmation message.
    pub async fn delete_all_numbers(&mut self) -> Result<String, NumsetError> {
        let response = self.send_command(Command::DeleteAll).await?;
        into_message(response)
    }

    /// Ends the session. Consumes the client; the daemon closes its side
    /// after responding.
    pub async fn exit_session(mut self) -> Result<String, NumsetError> {
        let response = self.send_command(Command::Exit).await?;
        into_message(response)
    }

    /// Sends one command and awaits exactly one response.
    async fn send_command(&mut self, command: Command) -> Result<Response, NumsetError> {
        debug!("Sending command: {}", command.name());
        self.framed.send(command.into()).await?;

        let result = tokio::time::timeout(self.timeout, self.framed.next())
            .await
            .map_err(|_| NumsetError::Timeout)?;
        match result {
            Some(Ok(Ok(WireMessage::Response(response)))) => Ok(response),
            Some(Ok(Ok(WireMessage::Command(_)))) => Err(NumsetError::SerializationError),
            Some(Ok(Err(e))) | Some(Err(e)) => Err(e),
            None => Err(NumsetError::ConnectionFailed),
        }
    }
}

/// Boundary validation: only positive integers are ever sent to the daemon.
pub fn validate_number(number: u64) -> Result<(), NumsetError> {
    if number == 0 {
        return Err(NumsetError::InvalidNumber);
    }
    Ok(())
}

/// Parses user-supplied text into a storable number, rejecting non-numeric
/// input and zero with `InvalidNumber`.
pub fn parse_number(raw: &str) -> Result<u64, NumsetError> {
    let number: u64 = raw.trim().parse()?;
    validate_number(number)?;
    Ok(number)
}

/// Turns a terminal response into the text shown to the user, mapping error
/// responses back to their error kinds.
fn into_message(response: Response) -> Result<String, NumsetError> {
    match response {
        Response::Success { message } => Ok(message),
        Response::Data { lines } => Ok(lines.join("\n")),
        Response::Error { code, .. } => Err(NumsetError::from_wire_code(code)),
    }
}
