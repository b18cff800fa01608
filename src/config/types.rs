// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub resources: ResourcesConfig,
    pub monitor: MonitorConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_host: String,
    pub api_port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub log_file: Option<String>,
    pub access_log: bool,
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Connection handling configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Static resource configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ResourcesConfig {
    /// Request paths starting with this prefix are served from the resource root
    pub route_prefix: String,
    /// Application base directory; the default root is `<base_dir>/images`
    #[serde(default)]
    pub base_dir: Option<String>,
    /// Host context parameters, consulted after process overrides
    #[serde(default)]
    pub context: HashMap<String, String>,
    /// Cache-Control set before serving; served files keep it instead of the default
    #[serde(default)]
    pub cache_control: Option<String>,
}

/// Monitor endpoint properties configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    pub data_dir_name: String,
    pub properties_file: String,
    pub default_storage_url: String,
    pub default_check_url: String,
}
