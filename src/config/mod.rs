// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ConfigError;

pub use state::AppState;
pub use types::{
    Config, LoggingConfig, MonitorConfig, PerformanceConfig, ResourcesConfig, ServerConfig,
};

impl Config {
    /// Load configuration from specified file path
    ///
    /// Sources, lowest precedence first: built-in defaults, the file (optional),
    /// `SERVER_*` environment variables (`__` separates nested keys).
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.api_host", "127.0.0.1")?
            .set_default("server.api_port", 8000)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "text")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("resources.route_prefix", "/images/")?
            .set_default("monitor.data_dir_name", "monitoring")?
            .set_default("monitor.properties_file", "controller.properties")?
            .set_default("monitor.default_storage_url", "http://localhost:8090/storage")?
            .set_default("monitor.default_check_url", "http://localhost:8090/check")?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_addr(&self.server.host, self.server.port)
    }

    pub fn get_api_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_addr(&self.server.api_host, self.server.api_port)
    }

    /// Application base directory, if configured
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.resources.base_dir.as_ref().map(PathBuf::from)
    }

    /// Location of the monitor properties file under the base directory
    pub fn monitor_properties_path(&self) -> Option<PathBuf> {
        self.base_dir().map(|base| {
            base.join(&self.monitor.data_dir_name)
                .join(&self.monitor.properties_file)
        })
    }
}

fn parse_addr(host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    let addr = format!("{host}:{port}");
    addr.parse()
        .map_err(|source| ConfigError::InvalidAddress { addr, source })
}

/// Parse `KEY=VALUE` process overrides
pub fn parse_overrides<I, S>(defines: I) -> Result<HashMap<String, String>, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    defines
        .into_iter()
        .map(|define| {
            let define = define.as_ref();
            match define.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    Ok((key.trim().to_string(), value.to_string()))
                }
                _ => Err(ConfigError::InvalidOverride(define.to_string())),
            }
        })
        .collect()
}
