// Monitor endpoint properties
// Flat key/value file holding the remote monitoring endpoints and API key

use std::fs;
use std::path::PathBuf;

use config::FileFormat;

use crate::config::MonitorConfig;
use crate::error::MonitorError;

const KEY_STORAGE_URL: &str = "url";
const KEY_CHECK_URL: &str = "checkurl";
const KEY_API_KEY: &str = "apikey";

/// Monitor endpoints, with configured defaults behind unset URLs
#[derive(Debug, Clone)]
pub struct MonitorProperties {
    path: Option<PathBuf>,
    default_storage_url: String,
    default_check_url: String,
    storage_url: Option<String>,
    check_url: Option<String>,
    api_key: Option<String>,
}

impl MonitorProperties {
    /// Load from `path`, falling back to defaults for anything missing
    ///
    /// Load problems are logged, never returned.
    pub fn load(path: Option<PathBuf>, defaults: &MonitorConfig) -> Self {
        let mut properties = Self {
            path,
            default_storage_url: defaults.default_storage_url.clone(),
            default_check_url: defaults.default_check_url.clone(),
            storage_url: None,
            check_url: None,
            api_key: None,
        };

        let Some(file) = properties.existing_file() else {
            return properties;
        };

        let settings = match config::Config::builder()
            .add_source(config::File::from(file.as_path()).format(FileFormat::Ini))
            .build()
        {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!("Failure reading {}: {e}", file.display());
                return properties;
            }
        };

        let read = |key: &str| settings.get_string(key).ok().map(|v| v.trim().to_string());
        properties.storage_url = read(KEY_STORAGE_URL);
        properties.check_url = read(KEY_CHECK_URL);
        properties.api_key = read(KEY_API_KEY);
        if properties.api_key.is_none() {
            tracing::error!("Failure reading '{KEY_API_KEY}' property from {}", file.display());
        }
        properties
    }

    /// The properties file, if it exists
    fn existing_file(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) if path.is_file() => Some(path.clone()),
            Some(path) => {
                tracing::warn!(
                    "Could not find monitor properties file. Expected location: {}",
                    path.display()
                );
                None
            }
            None => {
                tracing::warn!("Could not find monitor properties file, no data directory configured");
                None
            }
        }
    }

    pub fn storage_url(&self) -> &str {
        self.storage_url.as_deref().unwrap_or(&self.default_storage_url)
    }

    pub fn check_url(&self) -> &str {
        self.check_url.as_deref().unwrap_or(&self.default_check_url)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn set_storage_url(&mut self, url: impl Into<String>) {
        self.storage_url = Some(url.into());
    }

    pub fn set_check_url(&mut self, url: impl Into<String>) {
        self.check_url = Some(url.into());
    }

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.api_key = Some(key.into());
    }

    /// Persist the API key and any explicitly set URLs
    ///
    /// Defaults are never written. The file and its directory are created
    /// when missing.
    pub fn save(&self) -> Result<(), MonitorError> {
        let path = self.path.as_ref().ok_or(MonitorError::NoDataDirectory)?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| MonitorError::MissingApiKey(path.clone()))?;

        let mut content = format!("{KEY_API_KEY}={}\n", escape_value(api_key));
        if let Some(url) = &self.storage_url {
            content.push_str(&format!("{KEY_STORAGE_URL}={}\n", escape_value(url)));
        }
        if let Some(url) = &self.check_url {
            content.push_str(&format!("{KEY_CHECK_URL}={}\n", escape_value(url)));
        }

        if !path.exists() {
            tracing::warn!("Creating monitor properties: {}", path.display());
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|source| MonitorError::Write {
                    path: path.clone(),
                    source,
                })?;
            }
        }

        fs::write(path, content).map_err(|source| MonitorError::Write {
            path: path.clone(),
            source,
        })
    }
}

/// Escape a value so the INI reader in `load` returns it unchanged
///
/// The reader unescapes backslashes, strips a leading quote pair and ends
/// the value at a line break.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\0' => escaped.push_str("\\0"),
            '"' | '\'' | ';' | '#' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            c => escaped.push(c),
        }
    }
    escaped
}
