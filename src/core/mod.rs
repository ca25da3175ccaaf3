// src/core/mod.rs

//! The central module containing the core logic and data structures of numset.

pub mod errors;
pub mod processor;
pub mod protocol;
pub mod state;
pub mod storage;

pub use errors::NumsetError;
pub use processor::CommandProcessor;
pub use protocol::{Command, Response, WireMessage};
