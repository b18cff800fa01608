//! Logger module
//!
//! Installs the global `tracing` subscriber and provides the few structured
//! log lines shared across the server:
//! - Server lifecycle logging
//! - Access logging on the `access` target

pub mod writer;

use std::net::SocketAddr;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Config, LoggingConfig};
use crate::error::LoggerError;

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Should be called
/// once at application startup.
pub fn init(config: &LoggingConfig) -> Result<(), LoggerError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| LoggerError::Filter(format!("{}: {e}", config.level)))?,
    };

    let writer = writer::make_writer(config.log_file.as_deref())?;
    let with_ansi = config.log_file.is_none();

    let fmt_layer = if config.format == "json" {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(writer)
            .with_ansi(with_ansi)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| LoggerError::Init(e.to_string()))
}

pub fn log_server_start(addr: &SocketAddr, api_addr: &SocketAddr, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("Image resource server started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Management API on: http://{api_addr}");
    tracing::info!("Resource route: {}", config.resources.route_prefix);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(ref path) = config.logging.log_file {
        tracing::info!("Log file: {path}");
    }
    tracing::info!("======================================");
}

/// One access line per handled request
pub fn log_access(method: &str, path: &str, status: u16, bytes: usize) {
    tracing::info!(target: "access", method, path, status, bytes, "{method} {path} - {status} ({bytes} bytes)");
}
