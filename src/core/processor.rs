// src/core/processor.rs

//! Maps decoded commands onto store operations and builds the responses.

use crate::core::protocol::{Command, Response};
use crate::core::storage::NumberStore;
use std::sync::Arc;
use tracing::{debug, info};

/// The command dispatcher. A pure mapping from `Command` to `Response` with
/// no side effects beyond the store call; the store's own locking makes it
/// safe to invoke from any task.
#[derive(Debug, Clone)]
pub struct CommandProcessor {
    store: Arc<NumberStore>,
}

impl CommandProcessor {
    pub fn new(store: Arc<NumberStore>) -> Self {
        Self { store }
    }

    /// Processes one command against the store.
    pub fn process(&self, command: &Command) -> Response {
        debug!("Processing command: {}", command.name());
        match command {
            Command::Insert(number) => self.process_insert(*number),
            Command::Delete(number) => self.process_delete(*number),
            Command::PrintAll => self.process_print_all(),
            Command::DeleteAll => self.process_delete_all(),
            Command::Exit => self.process_exit(),
        }
    }

    fn process_insert(&self, number: u64) -> Response {
        match self.store.insert(number) {
            Ok(timestamp) => {
                Response::success(format!("Number {number} inserted at timestamp {timestamp}"))
            }
            Err(e) => Response::error(&e),
        }
    }

    fn process_delete(&self, number: u64) -> Response {
        match self.store.remove(number) {
            Ok(timestamp) => {
                Response::success(format!("Number {number} deleted at timestamp {timestamp}"))
            }
            Err(e) => Response::error(&e),
        }
    }

    fn process_print_all(&self) -> Response {
        let snapshot = self.store.snapshot();
        let lines = snapshot
            .iter()
            .map(|(number, timestamp)| format!("{number}:{timestamp}"))
            .collect();
        Response::data(lines)
    }

    fn process_delete_all(&self) -> Response {
        let count = self.store.clear();
        Response::success(format!("Deleted all numbers ({count} entries cleared)"))
    }

    fn process_exit(&self) -> Response {
        info!("Client requested exit");
        Response::success("Goodbye!")
    }
}
