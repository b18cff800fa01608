//! Request handler module
//!
//! Responsible for request routing dispatch on the application listener.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
