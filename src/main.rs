// src/main.rs

//! The main entry point for the numset daemon.

use anyhow::Result;
use numset::config::Config;
use numset::server;
use std::env;
use tracing::{error, info};
use tracing_subscriber::filter::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--version".to_string()) {
        println!("numset version {VERSION}");
        return Ok(());
    }

    // The configuration path can be provided via --config; otherwise the
    // default path is tried and missing-file falls back to built-in defaults.
    let config_path = args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str());

    let mut config = match config_path {
        Some(path) => match Config::from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Failed to load configuration from \"{path}\": {e}");
                std::process::exit(1);
            }
        },
        None => Config::from_file("numset.toml").unwrap_or_default(),
    };

    // Override the socket path if provided as a command-line argument.
    if let Some(socket_index) = args.iter().position(|arg| arg == "--socket") {
        if let Some(path) = args.get(socket_index + 1) {
            config.socket_path = path.clone();
        } else {
            eprintln!("--socket flag requires a value");
            std::process::exit(1);
        }
    }

    // Get the log filter from the env var or the config.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .compact()
        .with_ansi(true)
        .init();

    info!("Starting numset daemon (version {VERSION})");

    let mut daemon = match server::Daemon::start(config) {
        Ok(daemon) => daemon,
        Err(e) => {
            error!("Failed to start daemon: {e}");
            return Err(e);
        }
    };

    // OS signals stay outside the core: translate SIGINT/SIGTERM into the
    // daemon's shutdown signal.
    let controller = daemon.controller();
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown signal received, stopping daemon.");
        controller.stop();
    });

    daemon.run().await;
    Ok(())
}

async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to register SIGINT handler: {e}");
            return;
        }
    };
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to register SIGTERM handler: {e}");
            return;
        }
    };

    tokio::select! {
        _ = sigint.recv() => info!("SIGINT received."),
        _ = sigterm.recv() => info!("SIGTERM received."),
    }
}
