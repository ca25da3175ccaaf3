// src/config.rs

//! Manages daemon configuration: loading from a TOML file with defaults for
//! every field. The config is constructed once at process start and passed
//! into the core by value; the core never reaches for ambient settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// The daemon's (and client's) configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// Filesystem path of the Unix socket the daemon listens on.
    pub socket_path: String,
    /// Default log filter, overridable via `RUST_LOG`.
    pub log_level: String,
    /// Ceiling on concurrently-served sessions. New connections are not
    /// accepted while at the ceiling.
    pub max_connections: usize,
    /// Client-side timeout for connecting and for awaiting a response, in
    /// milliseconds.
    pub connect_timeout_ms: u64,
    /// Initial capacity of each session's I/O buffer, in bytes.
    pub buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            log_level: default_log_level(),
            max_connections: default_max_connections(),
            connect_timeout_ms: default_connect_timeout_ms(),
            buffer_size: default_buffer_size(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;
        Ok(config)
    }
}

fn default_socket_path() -> String {
    "/tmp/numset.sock".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_connections() -> usize {
    100
}

fn default_connect_timeout_ms() -> u64 {
    5000 // 5 seconds
}

fn default_buffer_size() -> usize {
    4096
}
