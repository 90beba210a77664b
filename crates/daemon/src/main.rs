// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tally host (tallyd)
//!
//! Reads scanner input from stdin, one barcode per line, and keeps the
//! stocktake ledger for a root directory. Replies are JSON lines on stdout.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod host;
mod input;
mod lifecycle;

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use crate::host::Reply;
use crate::lifecycle::{Config, LifecycleError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let root = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        std::env::current_dir()?
    };

    // Load configuration
    let config = Config::for_root(&root)?;

    // Write startup marker to log (before tracing setup)
    write_startup_marker(&config)?;

    // Set up logging
    let log_guard = setup_logging(&config)?;

    info!("Starting tallyd for root: {}", root.display());

    let mut host = match lifecycle::startup(&config).await {
        Ok(h) => h,
        Err(e) => {
            write_startup_error(&config, &e);
            error!("Failed to start: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("Ready, reading scanner input");
    write_reply(&mut stdout, &Reply::Ready).await?;

    // Main event loop
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if let Some(reply) = host::handle_line(&host.session, &config.root, &line).await {
                            write_reply(&mut stdout, &reply).await?;
                        }
                    }
                    Ok(None) => {
                        info!("Input closed, shutting down...");
                        break;
                    }
                    Err(e) => {
                        error!("Error reading input: {}", e);
                        break;
                    }
                }
            }

            Some(event) = host.events.recv() => {
                if let Some(reply) = host::event_reply(event) {
                    write_reply(&mut stdout, &reply).await?;
                }
            }

            // Graceful shutdown on SIGTERM
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                break;
            }

            // Graceful shutdown on SIGINT
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                break;
            }
        }
    }

    host.shutdown().await?;
    info!("tallyd stopped");
    Ok(())
}

async fn write_reply(stdout: &mut tokio::io::Stdout, reply: &Reply) -> std::io::Result<()> {
    let mut line = serde_json::to_vec(reply)?;
    line.push(b'\n');
    stdout.write_all(&line).await?;
    stdout.flush().await
}

/// Startup marker prefix written to log before anything else.
/// Full format: "--- tallyd: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- tallyd: starting (pid: ";

fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    append_log_line(
        config,
        &format!("{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id()),
    )?;
    Ok(())
}

/// Written synchronously: the non-blocking writer may not flush before exit
fn write_startup_error(config: &Config, error: &LifecycleError) {
    let _ = append_log_line(config, &format!("ERROR Failed to start: {}", error));
}

fn append_log_line(config: &Config, line: &str) -> std::io::Result<()> {
    use std::io::Write;

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    writeln!(file, "{}", line)
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or(LifecycleError::NoStateDir)?,
        config
            .log_path
            .file_name()
            .ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
