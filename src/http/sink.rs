//! Response sink module
//!
//! A sink accepts response headers followed by a byte stream. The resource
//! server writes into any [`ResponseSink`]; the dispatcher uses
//! [`BufferedSink`] and turns it into a hyper response afterwards.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::{Response, StatusCode};
use tokio::io::AsyncWrite;

/// Destination for a single response: headers, then body bytes
pub trait ResponseSink {
    type Output: AsyncWrite + Unpin;

    /// Whether a header was already set (e.g. by an upstream layer)
    fn contains_header(&self, name: &HeaderName) -> bool;

    /// Set or replace a header
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Output channel for the body
    fn output(&mut self) -> &mut Self::Output;
}

/// In-memory sink collecting headers and body
#[derive(Debug, Default)]
pub struct BufferedSink {
    headers: HeaderMap,
    body: Vec<u8>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink with a header already present before serving starts
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Header value as a string, if present and visible ASCII
    pub fn header_str(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Convert into a `200 OK` response; `is_head` drops the body but keeps headers
    pub fn into_response(self, is_head: bool) -> Response<Full<Bytes>> {
        let body = if is_head {
            Bytes::new()
        } else {
            Bytes::from(self.body)
        };

        let mut response = Response::new(Full::new(body));
        *response.status_mut() = StatusCode::OK;
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseSink for BufferedSink {
    type Output = Vec<u8>;

    fn contains_header(&self, name: &HeaderName) -> bool {
        self.headers.contains_key(name)
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    fn output(&mut self) -> &mut Self::Output {
        &mut self.body
    }
}
