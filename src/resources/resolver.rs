//! Resource root resolution
//!
//! Walks the provider chain and returns the first value naming an existing,
//! writable directory. Later providers are never consulted once one wins.

use std::fmt;
use std::path::{Path, PathBuf};

use super::provider::Provider;

/// Directory backing all resource lookups, with the provider that supplied it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoot {
    path: PathBuf,
    source: &'static str,
}

impl ResolvedRoot {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn source(&self) -> &'static str {
        self.source
    }
}

/// Why a configured directory was passed over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Missing,
    NotDirectory,
    ReadOnly,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("but this path does not exist"),
            Self::NotDirectory => f.write_str("which is not a directory"),
            Self::ReadOnly => f.write_str("which is not writeable"),
        }
    }
}

fn validate(path: &Path) -> Result<(), Rejection> {
    let metadata = std::fs::metadata(path).map_err(|_| Rejection::Missing)?;
    if !metadata.is_dir() {
        return Err(Rejection::NotDirectory);
    }
    if !writable(path, &metadata) {
        return Err(Rejection::ReadOnly);
    }
    Ok(())
}

/// Whether this process may create files in `path`
#[cfg(unix)]
fn writable(path: &Path, _metadata: &std::fs::Metadata) -> bool {
    rustix::fs::access(path, rustix::fs::Access::WRITE_OK).is_ok()
}

#[cfg(not(unix))]
fn writable(_path: &Path, metadata: &std::fs::Metadata) -> bool {
    !metadata.permissions().readonly()
}

/// Resolve the resource root for `key`
///
/// Returns `None` when no provider yields a valid directory; resource serving
/// is then disabled.
pub fn resolve(providers: &[Provider], key: &str) -> Option<ResolvedRoot> {
    for provider in providers {
        let source = provider.source();
        let Some(value) = provider.get(key) else {
            tracing::trace!("{source} {key} is not set");
            continue;
        };

        let path = PathBuf::from(&value);
        match validate(&path) {
            Ok(()) => {
                tracing::info!("{source} {key} set to {value}");
                let path = std::path::absolute(&path).unwrap_or(path);
                return Some(ResolvedRoot { path, source });
            }
            Err(rejection) => {
                tracing::warn!("{source} {key} set to {value}, {rejection}");
            }
        }
    }
    None
}
