//! Configuration providers for the resource root
//!
//! A provider is a labelled lookup `(key) -> Option<String>`. Providers are
//! kept in a plain ordered list; position in the list is the priority.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Sub-directory of the application base directory used as fallback root
pub const DEFAULT_SUBDIR: &str = "images";

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// A named source of configuration values
pub struct Provider {
    source: &'static str,
    lookup: Lookup,
}

impl Provider {
    /// Create a provider from a label and a lookup closure
    pub fn new<F>(source: &'static str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            source,
            lookup: Box::new(lookup),
        }
    }

    /// Values given explicitly to this process (`-D KEY=VALUE`)
    pub fn process_overrides(values: HashMap<String, String>) -> Self {
        Self::new("Process override", move |key| values.get(key).cloned())
    }

    /// Parameters handed down by the hosting server configuration
    ///
    /// Keys are matched case-insensitively since layered config sources may
    /// normalise key case.
    pub fn context_parameters(values: HashMap<String, String>) -> Self {
        Self::new("Host context parameter", move |key| {
            values
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(key))
                .map(|(_, value)| value.clone())
        })
    }

    /// OS environment variables
    pub fn environment() -> Self {
        Self::new("Environment variable", |key| std::env::var(key).ok())
    }

    /// Computed `<base_dir>/images`, for any key; yields nothing without a base directory
    pub fn default_value(base_dir: Option<PathBuf>) -> Self {
        let value = base_dir.map(|base| {
            let base = std::path::absolute(&base).unwrap_or(base);
            base.join(DEFAULT_SUBDIR).to_string_lossy().into_owned()
        });
        Self::new("Default value", move |_| value.clone())
    }

    /// Label naming where values come from
    pub const fn source(&self) -> &'static str {
        self.source
    }

    pub fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// The standard chain in priority order
pub fn default_chain(
    overrides: HashMap<String, String>,
    context: HashMap<String, String>,
    base_dir: Option<&Path>,
) -> Vec<Provider> {
    vec![
        Provider::process_overrides(overrides),
        Provider::context_parameters(context),
        Provider::environment(),
        Provider::default_value(base_dir.map(Path::to_path_buf)),
    ]
}
