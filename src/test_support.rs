//! Filesystem fixtures shared by unit tests

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tempfile::TempDir;

/// Fresh scratch directory, removed on drop
pub fn fixture_dir() -> TempDir {
    TempDir::new().expect("create fixture dir")
}

/// Write `content` to `dir/name` and return the full path
pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture file");
    path
}

/// Set the modification time of an existing file
pub fn set_modified(path: &Path, time: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .and_then(|f| f.set_modified(time))
        .expect("set fixture mtime");
}
