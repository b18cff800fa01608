//! Image resource server
//!
//! Serves static image resources from a single root directory chosen through
//! a prioritized chain of configuration providers, with HTTP caching headers
//! (`Content-Type`, `Content-Length`, `ETag`, `Last-Modified`, `Cache-Control`).

pub mod api;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod monitor;
pub mod resources;
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;
