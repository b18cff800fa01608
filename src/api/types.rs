// API request/response types module

use serde::{Deserialize, Serialize};

/// Resource root as seen by the running server
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceRootView {
    pub key: String,
    pub root: Option<String>,
    pub source: Option<String>,
}

/// Effective monitor endpoints; the API key itself is never returned
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitorView {
    pub storage_url: String,
    pub check_url: String,
    pub api_key_configured: bool,
}

/// Partial update of monitor settings
#[derive(Debug, Default, Deserialize)]
pub struct MonitorUpdate {
    #[serde(default)]
    pub storage_url: Option<String>,
    #[serde(default)]
    pub check_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}
