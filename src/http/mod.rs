//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! resource lookup itself.

pub mod cache;
pub mod mime;
pub mod response;
pub mod sink;

pub use response::{
    build_304_response, build_404_response, build_405_response, build_health_response,
    build_options_response,
};
pub use sink::{BufferedSink, ResponseSink};
