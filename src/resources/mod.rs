//! Static resource delivery
//!
//! - [`resolver`] picks the root directory from an ordered provider chain
//! - [`server`] serves one file under that root with caching headers
//!
//! The request path guard is deliberately minimal: only the text after the
//! last `/` is used as the file name. There is no `..` collapsing or
//! canonicalisation, so this is not a hardened isolation boundary.

pub mod descriptor;
pub mod provider;
pub mod resolver;
pub mod server;

pub use descriptor::{requested_file_name, ResourceDescriptor};
pub use provider::{default_chain, Provider};
pub use resolver::{resolve, ResolvedRoot};
pub use server::serve;

/// Configuration key naming the resource directory
pub const RESOURCE_DIR_KEY: &str = "IMAGE_RESOURCE_DIR";
