// Application state module
// Holds configuration, the resolved resource root and monitor settings

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::types::Config;
use crate::monitor::MonitorProperties;
use crate::resources::{self, ResolvedRoot, RESOURCE_DIR_KEY};

/// Application state shared by all connections
pub struct AppState {
    pub config: Config,
    /// Resolved once at startup, `None` disables resource serving
    pub resource_root: Option<ResolvedRoot>,
    pub monitor: RwLock<MonitorProperties>,
}

impl AppState {
    /// Build state, resolving the resource root through the provider chain
    ///
    /// `overrides` are process-level `KEY=VALUE` values and take priority
    /// over everything else.
    pub fn new(config: &Config, overrides: HashMap<String, String>) -> Self {
        let base_dir = config.base_dir();
        let providers = resources::default_chain(
            overrides,
            config.resources.context.clone(),
            base_dir.as_deref(),
        );
        let resource_root = resources::resolve(&providers, RESOURCE_DIR_KEY);
        if resource_root.is_none() {
            tracing::warn!("No usable {RESOURCE_DIR_KEY}, resource serving is disabled");
        }

        Self::with_root(config, resource_root)
    }

    /// Build state around an already resolved root
    pub fn with_root(config: &Config, resource_root: Option<ResolvedRoot>) -> Self {
        let monitor = MonitorProperties::load(config.monitor_properties_path(), &config.monitor);

        Self {
            config: config.clone(),
            resource_root,
            monitor: RwLock::new(monitor),
        }
    }
}
