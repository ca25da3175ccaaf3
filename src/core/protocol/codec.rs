// src/core/protocol/codec.rs

//! Implements the newline-framed text protocol and the corresponding
//! `Encoder` and `Decoder` for transport communication.
//!
//! Every frame is one line, `TAG:BODY\n`, with TAG either `CMD` or `RESP`.
//! The one exception is the `DATA` response, whose payload starts on the
//! line after the tag and may span multiple newline-terminated lines; the
//! frame is closed by a single blank line.

use super::message::{Command, Response, WireMessage};
use crate::core::NumsetError;
use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Hard cap on a single frame, to bound memory held for one peer.
const MAX_FRAME_BYTES: usize = 1024 * 1024;

const CMD_TAG: &str = "CMD";
const RESP_TAG: &str = "RESP";
const DATA_HEADER: &[u8] = b"RESP:DATA";

/// A `tokio_util::codec` implementation for the numset wire protocol.
#[derive(Debug, Default)]
pub struct WireCodec;

impl Encoder<WireMessage> for WireCodec {
    type Error = NumsetError;

    fn encode(&mut self, item: WireMessage, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            WireMessage::Command(cmd) => {
                dst.extend_from_slice(CMD_TAG.as_bytes());
                dst.extend_from_slice(b":");
                dst.extend_from_slice(cmd.name().as_bytes());
                if let Command::Insert(n) | Command::Delete(n) = cmd {
                    dst.extend_from_slice(b" ");
                    dst.extend_from_slice(n.to_string().as_bytes());
                }
                dst.extend_from_slice(b"\n");
            }
            WireMessage::Response(Response::Success { message }) => {
                ensure_single_line(&message)?;
                dst.extend_from_slice(b"RESP:SUCCESS");
                if !message.is_empty() {
                    dst.extend_from_slice(b" ");
                    dst.extend_from_slice(message.as_bytes());
                }
                dst.extend_from_slice(b"\n");
            }
            WireMessage::Response(Response::Error { code, message }) => {
                ensure_single_line(&message)?;
                dst.extend_from_slice(b"RESP:ERROR ");
                dst.extend_from_slice(code.to_string().as_bytes());
                if !message.is_empty() {
                    dst.extend_from_slice(b" ");
                    dst.extend_from_slice(message.as_bytes());
                }
                dst.extend_from_slice(b"\n");
            }
            WireMessage::Response(Response::Data { lines }) => {
                dst.extend_from_slice(DATA_HEADER);
                dst.extend_from_slice(b"\n");
                for line in &lines {
                    // An empty payload line would read as the frame terminator.
                    if line.is_empty() || line.contains('\n') {
                        return Err(NumsetError::SerializationError);
                    }
                    dst.extend_from_slice(line.as_bytes());
                    dst.extend_from_slice(b"\n");
                }
                dst.extend_from_slice(b"\n");
            }
        }
        Ok(())
    }
}

impl Decoder for WireCodec {
    type Item = Result<WireMessage, NumsetError>;
    type Error = NumsetError;

    /// Decodes one complete frame from the buffer, or `Ok(None)` when more
    /// bytes are needed. A malformed frame is consumed from the buffer and
    /// yielded as an inner `Err`, so the caller can answer with an error
    /// response and keep decoding subsequent frames. `Framed` fuses its
    /// stream after a `Decoder::Error`, so that channel is reserved for
    /// conditions that genuinely end the session: I/O failures and frames
    /// exceeding the size cap (after which framing is lost anyway).
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(header_end) = src.iter().position(|&b| b == b'\n') else {
            if src.len() > MAX_FRAME_BYTES {
                src.clear();
                return Err(NumsetError::SerializationError);
            }
            return Ok(None);
        };

        let frame_len = if &src[..header_end] == DATA_HEADER {
            // Multi-line DATA frame: runs until the blank line. Payload lines
            // are never empty, so the first "\n\n" is the terminator.
            match src[header_end..].windows(2).position(|w| w == b"\n\n") {
                Some(k) => header_end + k + 2,
                None => {
                    if src.len() > MAX_FRAME_BYTES {
                        src.clear();
                        return Err(NumsetError::SerializationError);
                    }
                    return Ok(None);
                }
            }
        } else {
            header_end + 1
        };

        let frame = src.copy_to_bytes(frame_len);
        Ok(Some(parse_frame(&frame)))
    }
}

/// Parses one complete frame (terminator included) into a message.
fn parse_frame(frame: &[u8]) -> Result<WireMessage, NumsetError> {
    let text = std::str::from_utf8(frame).map_err(|_| NumsetError::SerializationError)?;
    let (header, payload) = match text.split_once('\n') {
        Some(parts) => parts,
        None => (text, ""),
    };
    let (tag, body) = header
        .split_once(':')
        .ok_or(NumsetError::SerializationError)?;

    match tag {
        CMD_TAG => parse_command(body).map(WireMessage::Command),
        RESP_TAG => parse_response(body, payload).map(WireMessage::Response),
        _ => Err(NumsetError::SerializationError),
    }
}

fn parse_command(body: &str) -> Result<Command, NumsetError> {
    let (name, arg) = match body.split_once(' ') {
        Some((name, rest)) => (name, Some(rest)),
        None => (body, None),
    };
    match name {
        "INSERT" | "DELETE" => {
            let number: u64 = arg
                .ok_or(NumsetError::SerializationError)?
                .parse()
                .map_err(|_| NumsetError::SerializationError)?;
            Ok(if name == "INSERT" {
                Command::Insert(number)
            } else {
                Command::Delete(number)
            })
        }
        "PRINT_ALL" | "DELETE_ALL" | "EXIT" => {
            if arg.is_some() {
                return Err(NumsetError::SerializationError);
            }
            Ok(match name {
                "PRINT_ALL" => Command::PrintAll,
                "DELETE_ALL" => Command::DeleteAll,
                _ => Command::Exit,
            })
        }
        _ => Err(NumsetError::InvalidCommand),
    }
}

fn parse_response(body: &str, payload: &str) -> Result<Response, NumsetError> {
    let (name, rest) = match body.split_once(' ') {
        Some((name, rest)) => (name, Some(rest)),
        None => (body, None),
    };
    match name {
        "SUCCESS" => Ok(Response::Success {
            message: rest.unwrap_or_default().to_string(),
        }),
        "ERROR" => {
            let rest = rest.ok_or(NumsetError::SerializationError)?;
            let (code_str, message) = match rest.split_once(' ') {
                Some((code, message)) => (code, message),
                None => (rest, ""),
            };
            let code: u32 = code_str
                .parse()
                .map_err(|_| NumsetError::SerializationError)?;
            Ok(Response::Error {
                code,
                message: message.to_string(),
            })
        }
        "DATA" => {
            // The payload starts on the line after the tag; same-line
            // content is malformed.
            if rest.is_some() {
                return Err(NumsetError::SerializationError);
            }
            let lines = payload
                .split_terminator('\n')
                .take_while(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            Ok(Response::Data { lines })
        }
        _ => Err(NumsetError::SerializationError),
    }
}

fn ensure_single_line(message: &str) -> Result<(), NumsetError> {
    if message.contains('\n') {
        return Err(NumsetError::SerializationError);
    }
    Ok(())
}
