// src/core/protocol/mod.rs

//! The wire protocol: message types and the newline-framed codec.

pub mod codec;
pub mod message;

pub use codec::WireCodec;
pub use message::{Command, Response, WireMessage};
