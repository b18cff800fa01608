use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Startup configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("Invalid override '{0}', expected KEY=VALUE")]
    InvalidOverride(String),
}

/// Monitor endpoint properties errors
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Need api key to save: {}", .0.display())]
    MissingApiKey(PathBuf),

    #[error("No data directory configured for monitor properties")]
    NoDataDirectory,

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Logger initialization errors
#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Failed to open log file: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Logger already initialized: {0}")]
    Init(String),
}
