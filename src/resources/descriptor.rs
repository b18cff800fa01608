//! Per-request description of a resource file

use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use hyper::header::{HeaderValue, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, ETAG, LAST_MODIFIED};
use tokio::fs::File;

use crate::http::cache::{Validators, DEFAULT_CACHE_CONTROL};
use crate::http::mime;
use crate::http::ResponseSink;

/// Final `/`-delimited segment of a request path
///
/// Everything up to and including the last slash is discarded. Nothing else
/// is normalised: `..` and `.` pass through untouched.
pub fn requested_file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Attributes of a resource file, captured when it is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub path: PathBuf,
    pub length: u64,
    /// Milliseconds since the Unix epoch, 0 when unknown
    pub last_modified_ms: u64,
    pub content_type: Option<&'static str>,
}

impl ResourceDescriptor {
    /// Open `path` for reading and describe it
    ///
    /// Fails when the file is missing, unreadable, or a directory.
    pub async fn open(path: &Path) -> io::Result<(Self, File)> {
        let file = File::open(path).await?;
        let metadata = file.metadata().await?;
        if metadata.is_dir() {
            return Err(io::Error::other("is a directory"));
        }

        let last_modified_ms = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));

        let descriptor = Self {
            path: path.to_path_buf(),
            length: metadata.len(),
            last_modified_ms,
            content_type: mime::content_type_for(path),
        };
        Ok((descriptor, file))
    }

    /// Write `Content-Type`, `Content-Length`, validators and `Cache-Control`
    ///
    /// `Content-Type` is omitted when the media type is unknown, validators when
    /// the timestamp is 0, and `Cache-Control` when the sink already carries one.
    pub fn write_headers<S: ResponseSink>(&self, sink: &mut S) {
        if let Some(content_type) = self.content_type {
            sink.set_header(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        sink.set_header(CONTENT_LENGTH, HeaderValue::from(self.length));

        if let Some(validators) = Validators::from_timestamp(self.last_modified_ms) {
            if let Ok(etag) = HeaderValue::try_from(validators.etag) {
                sink.set_header(ETAG, etag);
            }
            if let Ok(last_modified) = HeaderValue::try_from(validators.last_modified) {
                sink.set_header(LAST_MODIFIED, last_modified);
            }
        }

        if !sink.contains_header(&CACHE_CONTROL) {
            sink.set_header(CACHE_CONTROL, HeaderValue::from_static(DEFAULT_CACHE_CONTROL));
        }
    }
}
