//! Resource serving
//!
//! Locates a single file under the resolved root, writes its caching headers
//! and streams its bytes into a [`ResponseSink`].

use std::io;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::descriptor::{requested_file_name, ResourceDescriptor};
use super::resolver::ResolvedRoot;
use super::RESOURCE_DIR_KEY;
use crate::http::ResponseSink;

/// Serve the file named by the last segment of `path`
///
/// Returns `false` without touching the sink when there is no root or the
/// file cannot be read. Returns `false` after headers were written when the
/// body copy fails part-way; the partial response is left as is.
pub async fn serve<S: ResponseSink>(root: Option<&ResolvedRoot>, path: &str, sink: &mut S) -> bool {
    let file_name = requested_file_name(path);
    tracing::debug!("Attempting to dispatch image resource: {file_name}");

    let Some(root) = root else {
        tracing::warn!(
            "Unable to dispatch image resource, the property {RESOURCE_DIR_KEY} is not set"
        );
        return false;
    };

    let candidate = root.path().join(file_name);
    let (descriptor, file) = match ResourceDescriptor::open(&candidate).await {
        Ok(opened) => opened,
        Err(e) => {
            tracing::warn!(
                "Error dispatching image resource response, {} not found: {e}",
                candidate.display()
            );
            return false;
        }
    };

    descriptor.write_headers(sink);

    match copy_body(file, descriptor.length, sink).await {
        Ok(copied) => {
            tracing::debug!("Dispatched {} ({copied} bytes)", descriptor.path.display());
            true
        }
        Err(e) => {
            tracing::warn!("Error dispatching image resource response: {e}");
            false
        }
    }
}

/// Copy at most `length` bytes of the file into the sink output
///
/// Bytes appended after the file was opened are not sent, so the body never
/// exceeds the advertised `Content-Length`. The file handle is owned here and
/// closed when this returns, on success or error.
async fn copy_body<S: ResponseSink>(file: File, length: u64, sink: &mut S) -> io::Result<u64> {
    let output = sink.output();
    let mut body = file.take(length);
    let copied = tokio::io::copy(&mut body, &mut *output).await?;
    output.flush().await?;
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::BufferedSink;
    use crate::resources::{resolve, Provider};
    use crate::test_support;
    use hyper::header::{
        HeaderName, HeaderValue, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, ETAG, LAST_MODIFIED,
    };
    use std::path::Path;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use std::time::{Duration, SystemTime};
    use tokio::io::AsyncWrite;

    fn root_at(dir: &Path) -> ResolvedRoot {
        let value = dir.to_string_lossy().into_owned();
        let providers = [Provider::new("test", move |_| Some(value.clone()))];
        resolve(&providers, RESOURCE_DIR_KEY).unwrap()
    }

    /// Sink whose body channel fails after accepting `limit` bytes
    struct FailingSink {
        headers: BufferedSink,
        output: FailingWriter,
    }

    struct FailingWriter {
        written: usize,
        limit: usize,
    }

    impl AsyncWrite for FailingWriter {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            if self.written >= self.limit {
                return Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "client went away")));
            }
            let n = buf.len().min(self.limit - self.written);
            self.written += n;
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    impl ResponseSink for FailingSink {
        type Output = FailingWriter;

        fn contains_header(&self, name: &HeaderName) -> bool {
            self.headers.contains_header(name)
        }

        fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
            self.headers.set_header(name, value);
        }

        fn output(&mut self) -> &mut Self::Output {
            &mut self.output
        }
    }

    /// Sink that appends to the served file on its first body write
    struct GrowingSink {
        headers: BufferedSink,
        output: GrowingWriter,
    }

    struct GrowingWriter {
        target: std::path::PathBuf,
        grown: bool,
        body: Vec<u8>,
    }

    impl AsyncWrite for GrowingWriter {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            if !self.grown {
                self.grown = true;
                let mut file = std::fs::OpenOptions::new().append(true).open(&self.target)?;
                std::io::Write::write_all(&mut file, b"appended later")?;
            }
            self.body.extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    impl ResponseSink for GrowingSink {
        type Output = GrowingWriter;

        fn contains_header(&self, name: &HeaderName) -> bool {
            self.headers.contains_header(name)
        }

        fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
            self.headers.set_header(name, value);
        }

        fn output(&mut self) -> &mut Self::Output {
            &mut self.output
        }
    }

    #[tokio::test]
    async fn test_serves_mixed_case_png() {
        let dir = test_support::fixture_dir();
        let content: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        test_support::write_file(dir.path(), "icon.PNG", &content);
        let root = root_at(dir.path());

        let mut sink = BufferedSink::new();
        assert!(serve(Some(&root), "/images/nested/icon.PNG", &mut sink).await);

        assert_eq!(sink.header_str(&CONTENT_TYPE), Some("image/png"));
        assert_eq!(sink.header_str(&CONTENT_LENGTH), Some("5000"));
        assert_eq!(sink.header_str(&CACHE_CONTROL), Some("max-age=86400"));
        assert_eq!(sink.body(), content.as_slice());
    }

    #[tokio::test]
    async fn test_only_last_segment_is_used() {
        let dir = test_support::fixture_dir();
        test_support::write_file(dir.path(), "logo.png", b"top");
        let nested = dir.path().join("a").join("b").join("c");
        std::fs::create_dir_all(&nested).unwrap();
        test_support::write_file(&nested, "logo.png", b"nested");
        let root = root_at(dir.path());

        let mut sink = BufferedSink::new();
        assert!(serve(Some(&root), "/a/b/c/logo.png", &mut sink).await);
        assert_eq!(sink.body(), b"top");
    }

    #[tokio::test]
    async fn test_absent_root_writes_nothing() {
        let mut sink = BufferedSink::new();
        assert!(!serve(None, "any.png", &mut sink).await);
        assert!(sink.headers().is_empty());
        assert!(sink.body().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_and_directory_write_nothing() {
        let dir = test_support::fixture_dir();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let root = root_at(dir.path());

        for path in ["/images/missing.png", "/images/sub", "/images/", "/images/.."] {
            let mut sink = BufferedSink::new();
            assert!(!serve(Some(&root), path, &mut sink).await, "{path}");
            assert!(sink.headers().is_empty(), "{path}");
            assert!(sink.body().is_empty(), "{path}");
        }
    }

    #[tokio::test]
    async fn test_etag_follows_modification_time() {
        let dir = test_support::fixture_dir();
        let path = test_support::write_file(dir.path(), "map.gif", b"GIF89a");
        let root = root_at(dir.path());

        test_support::set_modified(&path, SystemTime::UNIX_EPOCH + Duration::from_millis(1_700_000_000_000));
        let mut first = BufferedSink::new();
        let mut second = BufferedSink::new();
        assert!(serve(Some(&root), "map.gif", &mut first).await);
        assert!(serve(Some(&root), "map.gif", &mut second).await);
        assert_eq!(first.header_str(&ETAG), Some("\"1700000000000\""));
        assert_eq!(first.header_str(&ETAG), second.header_str(&ETAG));
        assert_eq!(first.header_str(&LAST_MODIFIED), Some("Tue, 14 Nov 2023 22:13:20 GMT"));

        test_support::set_modified(&path, SystemTime::UNIX_EPOCH + Duration::from_millis(1_700_000_060_000));
        let mut third = BufferedSink::new();
        assert!(serve(Some(&root), "map.gif", &mut third).await);
        assert_eq!(third.header_str(&ETAG), Some("\"1700000060000\""));
    }

    #[tokio::test]
    async fn test_zero_timestamp_omits_validators() {
        let dir = test_support::fixture_dir();
        let path = test_support::write_file(dir.path(), "old.jpg", b"jpeg");
        test_support::set_modified(&path, SystemTime::UNIX_EPOCH);
        let root = root_at(dir.path());

        let mut sink = BufferedSink::new();
        assert!(serve(Some(&root), "old.jpg", &mut sink).await);
        assert!(!sink.contains_header(&ETAG));
        assert!(!sink.contains_header(&LAST_MODIFIED));
        assert_eq!(sink.header_str(&CONTENT_LENGTH), Some("4"));
    }

    #[tokio::test]
    async fn test_upstream_cache_control_untouched() {
        let dir = test_support::fixture_dir();
        test_support::write_file(dir.path(), "a.png", b"png");
        let root = root_at(dir.path());

        let mut sink =
            BufferedSink::new().with_header(CACHE_CONTROL, HeaderValue::from_static("private, max-age=60"));
        assert!(serve(Some(&root), "a.png", &mut sink).await);
        assert_eq!(sink.header_str(&CACHE_CONTROL), Some("private, max-age=60"));
    }

    #[tokio::test]
    async fn test_unknown_type_omits_content_type() {
        let dir = test_support::fixture_dir();
        test_support::write_file(dir.path(), "data.xyz", b"??");
        let root = root_at(dir.path());

        let mut sink = BufferedSink::new();
        assert!(serve(Some(&root), "data.xyz", &mut sink).await);
        assert!(!sink.contains_header(&CONTENT_TYPE));
    }

    #[tokio::test]
    async fn test_copy_failure_returns_false() {
        let dir = test_support::fixture_dir();
        test_support::write_file(dir.path(), "big.png", &[1u8; 64 * 1024]);
        let root = root_at(dir.path());

        let mut sink = FailingSink {
            headers: BufferedSink::new(),
            output: FailingWriter { written: 0, limit: 1024 },
        };
        assert!(!serve(Some(&root), "big.png", &mut sink).await);
        // headers were already committed before the copy failed
        assert_eq!(sink.headers.header_str(&CONTENT_LENGTH), Some("65536"));
        assert_eq!(sink.output.written, 1024);
    }

    #[tokio::test]
    async fn test_body_stops_at_content_length() {
        let dir = test_support::fixture_dir();
        let content = vec![7u8; 5000];
        let target = test_support::write_file(dir.path(), "growing.png", &content);
        let root = root_at(dir.path());

        let mut sink = GrowingSink {
            headers: BufferedSink::new(),
            output: GrowingWriter { target: target.clone(), grown: false, body: Vec::new() },
        };
        assert!(serve(Some(&root), "growing.png", &mut sink).await);

        assert!(sink.output.grown);
        assert_eq!(sink.headers.header_str(&CONTENT_LENGTH), Some("5000"));
        assert_eq!(sink.output.body, content);
        assert!(std::fs::metadata(&target).unwrap().len() > 5000);
    }
}
